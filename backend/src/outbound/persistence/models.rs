//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each read row carries an `into_domain`
//! conversion; conversion failures (a malformed stored email or an unknown
//! status string) surface as readable `String` messages the adapters map to
//! query errors.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::auth::VerificationCode;
use crate::domain::catalog::Category;
use crate::domain::counting::{CountPeriod, CountSheet, CountSubmission};
use crate::domain::inventory::{AssignmentEvent, InventoryItem, ItemSummary};
use crate::domain::tickets::Ticket;
use crate::domain::{EmailAddress, User};

use super::schema::{
    categories, count_periods, count_submissions, inventory, inventory_assignments, tickets,
    users, verification_codes,
};

fn parse_email(raw: String, table: &str) -> Result<EmailAddress, String> {
    EmailAddress::new(&raw).map_err(|err| format!("{table} row holds an invalid email: {err}"))
}

fn parse_status<T>(raw: &str, table: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|err| format!("{table} row holds an invalid status: {err}"))
}

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, String> {
        Ok(User {
            id: self.id,
            email: parse_email(self.email, "users")?,
            role: parse_status(&self.role, "users")?,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub role: &'a str,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Verification code models
// ---------------------------------------------------------------------------

/// Row struct for reading from the verification_codes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = verification_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VerificationCodeRow {
    pub id: Uuid,
    pub email: String,
    pub fingerprint: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl VerificationCodeRow {
    pub(crate) fn into_domain(self) -> Result<VerificationCode, String> {
        Ok(VerificationCode {
            id: self.id,
            email: parse_email(self.email, "verification_codes")?,
            fingerprint: self.fingerprint,
            expires_at: self.expires_at,
            used: self.used,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for recording a freshly issued code.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = verification_codes)]
pub(crate) struct NewVerificationCodeRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub fingerprint: &'a str,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Category models
// ---------------------------------------------------------------------------

/// Row struct for reading from the categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CategoryRow {
    pub(crate) fn into_domain(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

/// Insertable struct for creating new category records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Inventory models
// ---------------------------------------------------------------------------

/// Row struct for reading from the inventory table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = inventory)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InventoryRow {
    pub id: Uuid,
    pub product_name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_code: String,
    pub product_code: String,
    pub assigned_user_email: Option<String>,
    pub category_id: Option<Uuid>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub assignment_date: Option<DateTime<Utc>>,
    pub unassignment_date: Option<DateTime<Utc>>,
    pub status: String,
    pub added_by_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryRow {
    pub(crate) fn into_domain(self) -> Result<InventoryItem, String> {
        Ok(InventoryItem {
            id: self.id,
            product_name: self.product_name,
            brand: self.brand,
            model: self.model,
            serial_code: self.serial_code,
            product_code: self.product_code,
            assigned_user_email: self
                .assigned_user_email
                .map(|raw| parse_email(raw, "inventory"))
                .transpose()?,
            category_id: self.category_id,
            location: self.location,
            notes: self.notes,
            purchase_date: self.purchase_date,
            warranty_end_date: self.warranty_end_date,
            assignment_date: self.assignment_date,
            unassignment_date: self.unassignment_date,
            status: parse_status(&self.status, "inventory")?,
            added_by_email: parse_email(self.added_by_email, "inventory")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Narrow row for worksheet and enrichment lookups.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = inventory)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemSummaryRow {
    pub id: Uuid,
    pub product_name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub product_code: String,
    pub serial_code: String,
}

impl ItemSummaryRow {
    pub(crate) fn into_domain(self) -> ItemSummary {
        ItemSummary {
            id: self.id,
            product_name: self.product_name,
            brand: self.brand,
            model: self.model,
            product_code: self.product_code,
            serial_code: self.serial_code,
        }
    }
}

/// Insertable struct for registering new items.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = inventory)]
pub(crate) struct NewInventoryRow<'a> {
    pub id: Uuid,
    pub product_name: &'a str,
    pub brand: Option<&'a str>,
    pub model: Option<&'a str>,
    pub serial_code: &'a str,
    pub product_code: &'a str,
    pub assigned_user_email: Option<&'a str>,
    pub category_id: Option<Uuid>,
    pub location: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub assignment_date: Option<DateTime<Utc>>,
    pub unassignment_date: Option<DateTime<Utc>>,
    pub status: &'a str,
    pub added_by_email: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct rewriting an item's descriptive columns.
///
/// Nullable columns use double options so an explicit `None` clears the
/// column rather than leaving it untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = inventory)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct InventoryUpdate<'a> {
    pub product_name: &'a str,
    pub brand: Option<&'a str>,
    pub model: Option<&'a str>,
    pub serial_code: &'a str,
    pub product_code: &'a str,
    pub assigned_user_email: Option<&'a str>,
    pub category_id: Option<Uuid>,
    pub location: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub assignment_date: Option<DateTime<Utc>>,
    pub unassignment_date: Option<DateTime<Utc>>,
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Assignment history models
// ---------------------------------------------------------------------------

/// Insertable struct for appending a history record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = inventory_assignments)]
pub(crate) struct NewAssignmentRow<'a> {
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub user_email: &'a str,
    pub assigned_at: DateTime<Utc>,
    pub unassigned_at: Option<DateTime<Utc>>,
    pub notes: Option<&'a str>,
}

impl<'a> NewAssignmentRow<'a> {
    pub(crate) fn from_event(event: &'a AssignmentEvent) -> Self {
        Self {
            id: event.id,
            inventory_id: event.inventory_id,
            user_email: event.user_email.as_str(),
            assigned_at: event.assigned_at,
            unassigned_at: event.unassigned_at,
            notes: event.notes.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ticket models
// ---------------------------------------------------------------------------

/// Row struct for reading from the tickets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketRow {
    pub id: Uuid,
    pub user_email: String,
    pub kind: String,
    pub inventory_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketRow {
    pub(crate) fn into_domain(self) -> Result<Ticket, String> {
        Ok(Ticket {
            id: self.id,
            user_email: parse_email(self.user_email, "tickets")?,
            kind: parse_status(&self.kind, "tickets")?,
            inventory_id: self.inventory_id,
            title: self.title,
            description: self.description,
            priority: parse_status(&self.priority, "tickets")?,
            status: parse_status(&self.status, "tickets")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating new ticket records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tickets)]
pub(crate) struct NewTicketRow<'a> {
    pub id: Uuid,
    pub user_email: &'a str,
    pub kind: &'a str,
    pub inventory_id: Option<Uuid>,
    pub title: &'a str,
    pub description: &'a str,
    pub priority: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Count period models
// ---------------------------------------------------------------------------

/// Row struct for reading from the count_periods table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = count_periods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CountPeriodRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CountPeriodRow {
    pub(crate) fn into_domain(self) -> Result<CountPeriod, String> {
        Ok(CountPeriod {
            id: self.id,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            status: parse_status(&self.status, "count_periods")?,
            created_by: parse_email(self.created_by, "count_periods")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for opening a new period.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = count_periods)]
pub(crate) struct NewCountPeriodRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: &'a str,
    pub created_by: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for rewriting a period.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = count_periods)]
pub(crate) struct CountPeriodUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` leaves the stored status untouched.
    pub status: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Count submission models
// ---------------------------------------------------------------------------

/// Row struct for reading from the count_submissions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = count_submissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CountSubmissionRow {
    pub id: Uuid,
    pub user_email: String,
    pub period_id: Uuid,
    pub sheet: serde_json::Value,
    pub status: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CountSubmissionRow {
    pub(crate) fn into_domain(self) -> Result<CountSubmission, String> {
        let sheet: CountSheet = serde_json::from_value(self.sheet)
            .map_err(|err| format!("count_submissions row holds an invalid sheet: {err}"))?;
        Ok(CountSubmission {
            id: self.id,
            user_email: parse_email(self.user_email, "count_submissions")?,
            period_id: self.period_id,
            sheet,
            status: parse_status(&self.status, "count_submissions")?,
            submitted_at: self.submitted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating a new submission row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = count_submissions)]
pub(crate) struct NewCountSubmissionRow<'a> {
    pub id: Uuid,
    pub user_email: &'a str,
    pub period_id: Uuid,
    pub sheet: &'a serde_json::Value,
    pub status: &'a str,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for overwriting a draft submission.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = count_submissions)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CountSubmissionUpdate<'a> {
    pub sheet: &'a serde_json::Value,
    pub status: &'a str,
    pub submitted_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
