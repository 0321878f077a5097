//! Inventory-count domain: periods, submissions, and the count sheet payload.
//!
//! A *period* is an administrator-defined window during which counting is
//! permitted. A *submission* is one user's count results for one period; it
//! is mutable while `draft` and permanently frozen once `submitted`. The
//! sheet maps inventory item identifiers to per-item count entries; the
//! identifiers are deliberately not foreign keys, so read paths must
//! tolerate references to items that have since been edited or deleted.

mod period_service;
mod submission_service;

pub use period_service::CountPeriodService;
pub use submission_service::CountSubmissionService;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::EmailAddress;

/// Domain error returned when counting values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CountingValidationError {
    /// Period name was missing or blank once trimmed.
    #[error("period name must not be empty")]
    EmptyName,
    /// Start date does not strictly precede the end date.
    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },
    /// Period status string is not one of the enumerated values.
    #[error("unknown period status: {0}")]
    UnknownPeriodStatus(String),
    /// Submission status string is not one of the enumerated values.
    #[error("unknown submission status: {0}")]
    UnknownSubmissionStatus(String),
}

/// Lifecycle status of a count period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Accepting submissions (subject to date-range gating by callers).
    Active,
    /// Counting finished.
    Completed,
    /// Abandoned by an administrator.
    Cancelled,
}

impl PeriodStatus {
    /// Stable string form stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for PeriodStatus {
    type Err = CountingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CountingValidationError::UnknownPeriodStatus(
                other.to_owned(),
            )),
        }
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An administrator-defined counting window.
///
/// ## Invariants
/// - `start_date` strictly precedes `end_date` (enforced by
///   [`CountPeriod::validate_dates`] on every create and update).
/// - "The active period" is not a hard invariant: several rows may carry
///   status `active` simultaneously. Query paths resolve the ambiguity by
///   recency of `created_at`; see [`CountPeriodService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountPeriod {
    /// Primary identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// First day counting is permitted.
    pub start_date: NaiveDate,
    /// Last day counting is permitted (inclusive).
    pub end_date: NaiveDate,
    /// Lifecycle status.
    pub status: PeriodStatus,
    /// Administrator who created the period.
    pub created_by: EmailAddress,
    /// Creation timestamp; recency resolves active-period ambiguity.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl CountPeriod {
    /// Check the strict date ordering invariant.
    pub fn validate_dates(
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), CountingValidationError> {
        if start >= end {
            return Err(CountingValidationError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    /// Whether the given day falls inside the period (inclusive bounds).
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

/// Field changes applied to an existing period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodChanges {
    /// Replacement display name.
    pub name: String,
    /// Replacement description.
    pub description: String,
    /// Replacement start date.
    pub start_date: NaiveDate,
    /// Replacement end date.
    pub end_date: NaiveDate,
    /// New status; `None` leaves the stored status unchanged.
    pub status: Option<PeriodStatus>,
    /// Modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Per-item observed count.
///
/// `actual` mirrors the worksheet wire format: an empty string means the user
/// has not answered yet, `"0"` means the item was not found, `"1"` means it
/// was counted present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ActualCount {
    /// No answer recorded yet.
    #[serde(rename = "")]
    Unset,
    /// Item reported missing.
    #[serde(rename = "0")]
    Missing,
    /// Item reported present.
    #[serde(rename = "1")]
    Present,
}

impl Default for ActualCount {
    fn default() -> Self {
        Self::Unset
    }
}

/// One line of a count sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct CountEntry {
    /// Quantity the system expects the user to hold.
    #[serde(default)]
    pub expected: i64,
    /// Observed presence answer.
    #[serde(default)]
    pub actual: ActualCount,
    /// Free-form remarks.
    #[serde(default)]
    pub notes: String,
}

/// User-supplied count payload keyed by inventory item identifier.
///
/// The keys are opaque strings at this layer: the engine does not verify
/// that they reference items currently assigned to the submitting user.
/// Enrichment on the admin read path resolves them defensively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountSheet(BTreeMap<String, CountEntry>);

impl CountSheet {
    /// Build a sheet from item-id / entry pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, CountEntry)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Item identifiers referenced by the sheet.
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over item-id / entry pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CountEntry)> {
        self.0.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Number of referenced items.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sheet references no items.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lifecycle status of a count submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Editable by the owner; may be deleted.
    Draft,
    /// Terminal: immutable and permanent.
    Submitted,
}

impl SubmissionStatus {
    /// Stable string form stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = CountingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            other => Err(CountingValidationError::UnknownSubmissionStatus(
                other.to_owned(),
            )),
        }
    }
}

/// One user's count results for one period.
///
/// ## Invariants
/// - At most one submission exists per (user, period) pair; the database
///   unique constraint is the final arbiter under concurrent saves.
/// - `submitted_at` is set exactly when the row transitions to
///   [`SubmissionStatus::Submitted`] and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountSubmission {
    /// Primary identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_email: EmailAddress,
    /// Owning period. Not cascade-protected: the period may have been
    /// deleted, leaving this row orphaned but still readable.
    pub period_id: Uuid,
    /// The count payload.
    pub sheet: CountSheet,
    /// Lifecycle status.
    pub status: SubmissionStatus,
    /// Set when the submission became final.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Result of a save call on the submission engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Identifier of the created or updated row.
    pub submission_id: Uuid,
    /// Whether this save was the terminal submission.
    pub final_submission: bool,
}

/// The user-facing view of the current period.
///
/// The period is selected by recency among `active` rows without filtering
/// by date containment; `is_in_period` carries the containment verdict so
/// callers gate write actions themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPeriodView {
    /// The most recently created `active` period.
    pub period: CountPeriod,
    /// Whether "now" falls inside the period's date range.
    pub is_in_period: bool,
    /// Whether the caller has a terminal submission for this period.
    pub has_submitted: bool,
    /// Whether the caller has an editable draft for this period.
    pub has_draft: bool,
    /// The caller's submission row, if any.
    pub submission: Option<CountSubmission>,
}

/// Display fields for an item referenced by a sheet.
///
/// Produced by enrichment on the admin read path. When the referenced item
/// no longer exists, placeholder fields are substituted so a single dangling
/// reference cannot break enumeration of the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDisplay {
    /// The referenced identifier, echoed back verbatim.
    pub id: String,
    /// Product name, or a placeholder.
    pub product_name: String,
    /// Product code, or `"N/A"`.
    pub product_code: String,
    /// Serial code, or `"N/A"`.
    pub serial_code: String,
}

impl ItemDisplay {
    /// Placeholder for a sheet reference that resolves to no known item.
    pub fn missing(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            product_name: "Item not found".to_owned(),
            product_code: "N/A".to_owned(),
            serial_code: "N/A".to_owned(),
        }
    }
}

/// A sheet entry joined with the display fields of its item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// The user's count entry.
    pub entry: CountEntry,
    /// Current item display fields or a placeholder.
    pub item: ItemDisplay,
}

/// An administrator-facing submission with every sheet reference resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedSubmission {
    /// Submission identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_email: EmailAddress,
    /// Owning period.
    pub period_id: Uuid,
    /// Lifecycle status.
    pub status: SubmissionStatus,
    /// When the submission became final, if it did.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Sheet entries with item display fields resolved.
    pub entries: BTreeMap<String, ResolvedEntry>,
}
