//! Port for count-submission persistence.
//!
//! The (user, period) uniqueness invariant is enforced by the backing
//! store: adapters must surface unique-constraint violations as
//! [`CountSubmissionRepositoryError::DuplicateSubmission`] so the engine can
//! convert the losing side of a concurrent insert race into a conflict.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::counting::CountSubmission;
use crate::domain::user::EmailAddress;

/// Errors raised by count-submission repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CountSubmissionRepositoryError {
    /// Repository connection could not be established.
    #[error("count submission repository connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("count submission repository query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
    /// Insert violated the one-submission-per-(user, period) constraint.
    #[error("submission already exists for this user and period: {message}")]
    DuplicateSubmission {
        /// Adapter-provided context.
        message: String,
    },
}

impl CountSubmissionRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-submission error with the given message.
    pub fn duplicate_submission(message: impl Into<String>) -> Self {
        Self::DuplicateSubmission {
            message: message.into(),
        }
    }
}

/// Port for count-submission storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountSubmissionRepository: Send + Sync {
    /// Fetch the unique submission for a (user, period) pair, if present.
    async fn find_by_user_and_period(
        &self,
        user: &EmailAddress,
        period_id: Uuid,
    ) -> Result<Option<CountSubmission>, CountSubmissionRepositoryError>;

    /// Insert a new submission row.
    ///
    /// Fails with [`CountSubmissionRepositoryError::DuplicateSubmission`]
    /// when a row already exists for the (user, period) pair.
    async fn insert(
        &self,
        submission: &CountSubmission,
    ) -> Result<(), CountSubmissionRepositoryError>;

    /// Overwrite the sheet, status, and timestamps of an existing draft.
    ///
    /// The update is filtered on `status = draft` in the store so a row that
    /// concurrently became `submitted` is never modified; such a miss is
    /// reported as `Ok(false)`.
    async fn update_draft(
        &self,
        submission: &CountSubmission,
    ) -> Result<bool, CountSubmissionRepositoryError>;

    /// Delete the draft submission for a (user, period) pair.
    ///
    /// Only rows with status `draft` match; returns `Ok(false)` otherwise.
    async fn delete_draft(
        &self,
        user: &EmailAddress,
        period_id: Uuid,
    ) -> Result<bool, CountSubmissionRepositoryError>;

    /// Every submission row for the period, most recently updated first.
    async fn list_for_period(
        &self,
        period_id: Uuid,
    ) -> Result<Vec<CountSubmission>, CountSubmissionRepositoryError>;
}

/// Fixture implementation for tests that do not exercise submission storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCountSubmissionRepository;

#[async_trait]
impl CountSubmissionRepository for FixtureCountSubmissionRepository {
    async fn find_by_user_and_period(
        &self,
        _user: &EmailAddress,
        _period_id: Uuid,
    ) -> Result<Option<CountSubmission>, CountSubmissionRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        _submission: &CountSubmission,
    ) -> Result<(), CountSubmissionRepositoryError> {
        Ok(())
    }

    async fn update_draft(
        &self,
        _submission: &CountSubmission,
    ) -> Result<bool, CountSubmissionRepositoryError> {
        Ok(false)
    }

    async fn delete_draft(
        &self,
        _user: &EmailAddress,
        _period_id: Uuid,
    ) -> Result<bool, CountSubmissionRepositoryError> {
        Ok(false)
    }

    async fn list_for_period(
        &self,
        _period_id: Uuid,
    ) -> Result<Vec<CountSubmission>, CountSubmissionRepositoryError> {
        Ok(Vec::new())
    }
}
