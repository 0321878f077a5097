//! Inventory items and assignment tracking.
//!
//! Each item optionally carries a single nullable assignment to a user;
//! every assignment and unassignment is additionally recorded in an
//! append-only history log. Unassignment stamps the open history record
//! rather than mutating past entries.

mod service;

pub use service::InventoryService;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::user::EmailAddress;

/// Domain error returned when inventory values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryValidationError {
    /// A required descriptive field was missing or blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    /// Item status string is not one of the enumerated values.
    #[error("unknown item status: {0}")]
    UnknownStatus(String),
}

/// Operational status of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// In service.
    Active,
    /// Temporarily out for maintenance.
    Maintenance,
    /// Out of service.
    Broken,
    /// Legacy value from older data; treated as in service and assigned.
    Assigned,
}

impl ItemStatus {
    /// Stable string form stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Broken => "broken",
            Self::Assigned => "assigned",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = InventoryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "maintenance" => Ok(Self::Maintenance),
            "broken" => Ok(Self::Broken),
            "assigned" => Ok(Self::Assigned),
            other => Err(InventoryValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    /// Primary identifier.
    pub id: Uuid,
    /// Display name.
    pub product_name: String,
    /// Manufacturer, when known.
    pub brand: Option<String>,
    /// Model designation, when known.
    pub model: Option<String>,
    /// Unique manufacturer serial code.
    pub serial_code: String,
    /// Unique internal product code.
    pub product_code: String,
    /// User currently responsible for the item, if any.
    pub assigned_user_email: Option<EmailAddress>,
    /// Category reference, if categorised.
    pub category_id: Option<Uuid>,
    /// Physical location note.
    pub location: Option<String>,
    /// Free-form remarks.
    pub notes: Option<String>,
    /// Purchase date, when recorded.
    pub purchase_date: Option<NaiveDate>,
    /// Warranty expiry, when recorded.
    pub warranty_end_date: Option<NaiveDate>,
    /// When the current assignment began.
    pub assignment_date: Option<DateTime<Utc>>,
    /// When the item was last unassigned.
    pub unassignment_date: Option<DateTime<Utc>>,
    /// Operational status.
    pub status: ItemStatus,
    /// Administrator who registered the item.
    pub added_by_email: EmailAddress,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An item joined with display names from related tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItemView {
    /// The item itself.
    pub item: InventoryItem,
    /// Name of the referenced category, when it still exists.
    pub category_name: Option<String>,
}

/// Compact display fields used to build count worksheets and enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    /// Item identifier.
    pub id: Uuid,
    /// Display name.
    pub product_name: String,
    /// Manufacturer, when known.
    pub brand: Option<String>,
    /// Model designation, when known.
    pub model: Option<String>,
    /// Internal product code.
    pub product_code: String,
    /// Manufacturer serial code.
    pub serial_code: String,
}

/// One record of the append-only assignment history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentEvent {
    /// Primary identifier.
    pub id: Uuid,
    /// The item that changed hands.
    pub inventory_id: Uuid,
    /// The user the item was assigned to.
    pub user_email: EmailAddress,
    /// When the assignment began.
    pub assigned_at: DateTime<Utc>,
    /// When the assignment ended; `None` while open.
    pub unassigned_at: Option<DateTime<Utc>>,
    /// Context note, e.g. "initial assignment".
    pub notes: Option<String>,
}

/// Validated descriptive fields for a new or updated item.
///
/// Required fields are checked here so services and adapters can rely on
/// non-empty name and codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    /// Display name (required).
    pub product_name: String,
    /// Manufacturer.
    pub brand: Option<String>,
    /// Model designation.
    pub model: Option<String>,
    /// Unique manufacturer serial code (required).
    pub serial_code: String,
    /// Unique internal product code (required).
    pub product_code: String,
    /// User to assign the item to.
    pub assigned_user_email: Option<EmailAddress>,
    /// Category reference.
    pub category_id: Option<Uuid>,
    /// Physical location note.
    pub location: Option<String>,
    /// Free-form remarks.
    pub notes: Option<String>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Warranty expiry.
    pub warranty_end_date: Option<NaiveDate>,
    /// Operational status; `None` defaults to [`ItemStatus::Active`].
    pub status: Option<ItemStatus>,
}

impl ItemSpec {
    /// Check the required descriptive fields.
    pub fn validate(&self) -> Result<(), InventoryValidationError> {
        if self.product_name.trim().is_empty() {
            return Err(InventoryValidationError::EmptyField("product name"));
        }
        if self.serial_code.trim().is_empty() {
            return Err(InventoryValidationError::EmptyField("serial code"));
        }
        if self.product_code.trim().is_empty() {
            return Err(InventoryValidationError::EmptyField("product code"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn spec() -> ItemSpec {
        ItemSpec {
            product_name: "ThinkPad T14".into(),
            brand: Some("Lenovo".into()),
            model: Some("T14 Gen 4".into()),
            serial_code: "SN-0001".into(),
            product_code: "IT-0001".into(),
            assigned_user_email: None,
            category_id: None,
            location: None,
            notes: None,
            purchase_date: None,
            warranty_end_date: None,
            status: None,
        }
    }

    #[test]
    fn complete_spec_validates() {
        spec().validate().expect("required fields present");
    }

    #[rstest]
    #[case("product_name", "product name")]
    #[case("serial_code", "serial code")]
    #[case("product_code", "product code")]
    fn blank_required_fields_fail(#[case] field: &str, #[case] expected: &'static str) {
        let mut candidate = spec();
        match field {
            "product_name" => candidate.product_name = "  ".into(),
            "serial_code" => candidate.serial_code = String::new(),
            _ => candidate.product_code = " ".into(),
        }
        let err = candidate.validate().expect_err("blank field must fail");
        assert_eq!(err, InventoryValidationError::EmptyField(expected));
    }

    #[rstest]
    #[case("active", ItemStatus::Active)]
    #[case("maintenance", ItemStatus::Maintenance)]
    #[case("broken", ItemStatus::Broken)]
    #[case("assigned", ItemStatus::Assigned)]
    fn statuses_parse(#[case] raw: &str, #[case] expected: ItemStatus) {
        assert_eq!(raw.parse::<ItemStatus>().expect("known status"), expected);
        assert_eq!(expected.as_str(), raw);
    }
}
