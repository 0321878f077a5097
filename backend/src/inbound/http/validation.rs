//! Shared validation helpers for inbound HTTP payloads.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{EmailAddress, Error};

fn field_error(field: &str, message: String, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn missing_field(field: &'static str) -> Error {
    field_error(field, format!("missing required field: {field}"), "missing_field")
}

pub(crate) fn parse_uuid(value: &str, field: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(value)
        .map_err(|_| field_error(field, format!("{field} must be a valid UUID"), "invalid_uuid"))
}

pub(crate) fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            format!("{field} must be a YYYY-MM-DD date"),
            "invalid_date",
        )
    })
}

pub(crate) fn parse_email(value: &str, field: &'static str) -> Result<EmailAddress, Error> {
    EmailAddress::new(value)
        .map_err(|err| field_error(field, err.to_string(), "invalid_email"))
}
