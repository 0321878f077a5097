//! Count-period registry service.
//!
//! Implements [`CountPeriodOps`] over a period repository, with the
//! submission repository consulted to annotate the user-facing view of the
//! current period.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::counting::{
    CountPeriod, CountingValidationError, PeriodChanges, PeriodStatus, SubmissionStatus,
    UserPeriodView,
};
use crate::domain::error::Error;
use crate::domain::ports::{
    CountPeriodOps, CountPeriodRepository, CountPeriodRepositoryError, CountSubmissionRepository,
    CountSubmissionRepositoryError, CreatePeriodRequest, UpdatePeriodRequest,
};
use crate::domain::user::EmailAddress;

/// Period registry service implementing the driving port.
#[derive(Clone)]
pub struct CountPeriodService<P, S> {
    periods: Arc<P>,
    submissions: Arc<S>,
}

impl<P, S> CountPeriodService<P, S> {
    /// Create a new service over the given repositories.
    pub fn new(periods: Arc<P>, submissions: Arc<S>) -> Self {
        Self {
            periods,
            submissions,
        }
    }
}

fn map_period_error(error: CountPeriodRepositoryError) -> Error {
    match error {
        CountPeriodRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("period repository unavailable: {message}"))
        }
        CountPeriodRepositoryError::Query { message } => {
            Error::internal(format!("period repository error: {message}"))
        }
    }
}

fn map_submission_error(error: CountSubmissionRepositoryError) -> Error {
    match error {
        CountSubmissionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("submission repository unavailable: {message}"))
        }
        CountSubmissionRepositoryError::Query { message }
        | CountSubmissionRepositoryError::DuplicateSubmission { message } => {
            Error::internal(format!("submission repository error: {message}"))
        }
    }
}

fn map_validation_error(error: &CountingValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn validate_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(map_validation_error(&CountingValidationError::EmptyName));
    }
    Ok(())
}

impl<P, S> CountPeriodService<P, S>
where
    P: CountPeriodRepository,
    S: CountSubmissionRepository,
{
    /// The most recently created `active` period, warning when the status is
    /// ambiguous.
    async fn newest_active(&self) -> Result<Option<CountPeriod>, Error> {
        let active = self
            .periods
            .active_newest_first()
            .await
            .map_err(map_period_error)?;
        if active.len() > 1 {
            tracing::warn!(
                count = active.len(),
                resolved = %active[0].id,
                "multiple active count periods; resolving by most recent"
            );
        }
        Ok(active.into_iter().next())
    }
}

#[async_trait]
impl<P, S> CountPeriodOps for CountPeriodService<P, S>
where
    P: CountPeriodRepository,
    S: CountSubmissionRepository,
{
    async fn create_period(&self, request: CreatePeriodRequest) -> Result<CountPeriod, Error> {
        validate_name(&request.name)?;
        CountPeriod::validate_dates(request.start_date, request.end_date)
            .map_err(|err| map_validation_error(&err))?;
        let now = Utc::now();
        let period = CountPeriod {
            id: Uuid::new_v4(),
            name: request.name.trim().to_owned(),
            description: request.description,
            start_date: request.start_date,
            end_date: request.end_date,
            status: PeriodStatus::Active,
            created_by: request.created_by,
            created_at: now,
            updated_at: now,
        };
        self.periods
            .insert(&period)
            .await
            .map_err(map_period_error)?;
        tracing::info!(period_id = %period.id, name = %period.name, "count period created");
        Ok(period)
    }

    async fn update_period(&self, request: UpdatePeriodRequest) -> Result<CountPeriod, Error> {
        validate_name(&request.name)?;
        CountPeriod::validate_dates(request.start_date, request.end_date)
            .map_err(|err| map_validation_error(&err))?;
        let changes = PeriodChanges {
            name: request.name.trim().to_owned(),
            description: request.description,
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
            updated_at: Utc::now(),
        };
        let updated = self
            .periods
            .update(request.period_id, &changes)
            .await
            .map_err(map_period_error)?;
        if !updated {
            return Err(Error::not_found("count period not found"));
        }
        self.periods
            .find_by_id(request.period_id)
            .await
            .map_err(map_period_error)?
            .ok_or_else(|| Error::not_found("count period not found"))
    }

    async fn list_periods(&self) -> Result<Vec<CountPeriod>, Error> {
        self.periods
            .list_newest_first()
            .await
            .map_err(map_period_error)
    }

    async fn active_period_for_admin(&self) -> Result<Option<CountPeriod>, Error> {
        let today = Utc::now().date_naive();
        let active = self
            .periods
            .active_newest_first()
            .await
            .map_err(map_period_error)?;
        Ok(active.into_iter().find(|period| period.contains(today)))
    }

    async fn active_period_for_user(
        &self,
        user: &EmailAddress,
    ) -> Result<Option<UserPeriodView>, Error> {
        let Some(period) = self.newest_active().await? else {
            return Ok(None);
        };
        let submission = self
            .submissions
            .find_by_user_and_period(user, period.id)
            .await
            .map_err(map_submission_error)?;
        let is_in_period = period.contains(Utc::now().date_naive());
        let (has_submitted, has_draft) = match submission.as_ref().map(|s| s.status) {
            Some(SubmissionStatus::Submitted) => (true, false),
            Some(SubmissionStatus::Draft) => (false, true),
            None => (false, false),
        };
        Ok(Some(UserPeriodView {
            period,
            is_in_period,
            has_submitted,
            has_draft,
            submission,
        }))
    }

    async fn delete_period(&self, period_id: Uuid) -> Result<(), Error> {
        let deleted = self
            .periods
            .delete(period_id)
            .await
            .map_err(map_period_error)?;
        if !deleted {
            return Err(Error::not_found("count period not found"));
        }
        tracing::info!(period_id = %period_id, "count period deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "period_service_tests.rs"]
mod tests;
