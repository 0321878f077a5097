//! Driving ports for the counting workflow.
//!
//! [`CountPeriodOps`] covers the administrator-facing period registry and the
//! read paths both roles use to discover the current period.
//! [`CountSubmissionOps`] is the submission engine: the draft/submit state
//! machine and the admin review listing.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::counting::{
    CountPeriod, CountSheet, EnrichedSubmission, PeriodStatus, SaveOutcome, UserPeriodView,
};
use crate::domain::error::Error;
use crate::domain::user::EmailAddress;

/// Request to open a new count period.
#[derive(Debug, Clone)]
pub struct CreatePeriodRequest {
    /// Display name; must not be blank.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// First day counting is permitted.
    pub start_date: NaiveDate,
    /// Last day counting is permitted (inclusive).
    pub end_date: NaiveDate,
    /// Administrator opening the period.
    pub created_by: EmailAddress,
}

/// Request to rewrite an existing period.
#[derive(Debug, Clone)]
pub struct UpdatePeriodRequest {
    /// The period to modify.
    pub period_id: Uuid,
    /// Replacement display name; must not be blank.
    pub name: String,
    /// Replacement description.
    pub description: String,
    /// Replacement start date.
    pub start_date: NaiveDate,
    /// Replacement end date.
    pub end_date: NaiveDate,
    /// New status; `None` leaves the stored status unchanged.
    pub status: Option<PeriodStatus>,
}

/// Request to create or overwrite the caller's count submission.
#[derive(Debug, Clone)]
pub struct SaveSubmissionRequest {
    /// The submitting user.
    pub user_email: EmailAddress,
    /// The period being counted.
    pub period_id: Uuid,
    /// The full replacement sheet.
    pub sheet: CountSheet,
    /// `true` to finalise, `false` to keep the row editable.
    pub submit: bool,
}

/// Driving port for the count-period registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountPeriodOps: Send + Sync {
    /// Open a new period with status `active`.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error when the name is blank or the dates
    /// are not strictly ordered.
    async fn create_period(&self, request: CreatePeriodRequest) -> Result<CountPeriod, Error>;

    /// Rewrite an existing period.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no period carries the identifier, and
    /// an invalid-request error for a blank name or unordered dates.
    async fn update_period(&self, request: UpdatePeriodRequest) -> Result<CountPeriod, Error>;

    /// Every period, newest first.
    async fn list_periods(&self) -> Result<Vec<CountPeriod>, Error>;

    /// The current period for the admin dashboard: the most recently created
    /// `active` period whose date range contains today, if any.
    async fn active_period_for_admin(&self) -> Result<Option<CountPeriod>, Error>;

    /// The current period from the caller's point of view: the most recently
    /// created `active` period regardless of its date range, annotated with
    /// date containment and the caller's submission state.
    async fn active_period_for_user(
        &self,
        user: &EmailAddress,
    ) -> Result<Option<UserPeriodView>, Error>;

    /// Remove a period. Submissions referencing it are left in place.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no period carries the identifier.
    async fn delete_period(&self, period_id: Uuid) -> Result<(), Error>;
}

/// Driving port for the count-submission engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountSubmissionOps: Send + Sync {
    /// Create or overwrite the caller's submission for a period.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when a terminal submission already exists
    /// for the (user, period) pair, including when a concurrent save wins
    /// the race.
    async fn save(&self, request: SaveSubmissionRequest) -> Result<SaveOutcome, Error>;

    /// Discard the caller's draft for a period.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no submission exists and a conflict
    /// error when the submission is already terminal.
    async fn delete_draft(&self, user: &EmailAddress, period_id: Uuid) -> Result<(), Error>;

    /// Every submission for a period with sheet references resolved to item
    /// display fields, for admin review.
    async fn submissions_for_period(
        &self,
        period_id: Uuid,
    ) -> Result<Vec<EnrichedSubmission>, Error>;
}

/// Fixture implementation returning empty results.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCountPeriodOps;

#[async_trait]
impl CountPeriodOps for FixtureCountPeriodOps {
    async fn create_period(&self, _request: CreatePeriodRequest) -> Result<CountPeriod, Error> {
        Err(Error::internal("period fixture has no storage"))
    }

    async fn update_period(&self, _request: UpdatePeriodRequest) -> Result<CountPeriod, Error> {
        Err(Error::not_found("count period not found"))
    }

    async fn list_periods(&self) -> Result<Vec<CountPeriod>, Error> {
        Ok(Vec::new())
    }

    async fn active_period_for_admin(&self) -> Result<Option<CountPeriod>, Error> {
        Ok(None)
    }

    async fn active_period_for_user(
        &self,
        _user: &EmailAddress,
    ) -> Result<Option<UserPeriodView>, Error> {
        Ok(None)
    }

    async fn delete_period(&self, _period_id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("count period not found"))
    }
}

/// Fixture implementation returning empty results.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCountSubmissionOps;

#[async_trait]
impl CountSubmissionOps for FixtureCountSubmissionOps {
    async fn save(&self, _request: SaveSubmissionRequest) -> Result<SaveOutcome, Error> {
        Err(Error::internal("submission fixture has no storage"))
    }

    async fn delete_draft(&self, _user: &EmailAddress, _period_id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("no submission found for this period"))
    }

    async fn submissions_for_period(
        &self,
        _period_id: Uuid,
    ) -> Result<Vec<EnrichedSubmission>, Error> {
        Ok(Vec::new())
    }
}
