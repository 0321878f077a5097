//! Port for count-period persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::counting::{CountPeriod, PeriodChanges};

/// Errors raised by count-period repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CountPeriodRepositoryError {
    /// Repository connection could not be established.
    #[error("count period repository connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("count period repository query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
}

impl CountPeriodRepositoryError {
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
}

/// Port for count-period storage and retrieval.
///
/// Listing methods order by `created_at` descending so the first element of
/// [`CountPeriodRepository::active_newest_first`] is "the" active period
/// under the recency resolution rule.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountPeriodRepository: Send + Sync {
    /// Persist a new period.
    async fn insert(&self, period: &CountPeriod) -> Result<(), CountPeriodRepositoryError>;

    /// Apply changes to an existing period.
    ///
    /// Returns `Ok(false)` when no row matched the identifier.
    async fn update(
        &self,
        id: Uuid,
        changes: &PeriodChanges,
    ) -> Result<bool, CountPeriodRepositoryError>;

    /// Delete a period without cascading to submissions.
    ///
    /// Returns `Ok(false)` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, CountPeriodRepositoryError>;

    /// Fetch a period by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CountPeriod>, CountPeriodRepositoryError>;

    /// All periods, newest first.
    async fn list_newest_first(&self) -> Result<Vec<CountPeriod>, CountPeriodRepositoryError>;

    /// All periods with status `active`, newest first.
    async fn active_newest_first(&self) -> Result<Vec<CountPeriod>, CountPeriodRepositoryError>;
}

/// Fixture implementation for tests that do not exercise period storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCountPeriodRepository;

#[async_trait]
impl CountPeriodRepository for FixtureCountPeriodRepository {
    async fn insert(&self, _period: &CountPeriod) -> Result<(), CountPeriodRepositoryError> {
        Ok(())
    }

    async fn update(
        &self,
        _id: Uuid,
        _changes: &PeriodChanges,
    ) -> Result<bool, CountPeriodRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, CountPeriodRepositoryError> {
        Ok(false)
    }

    async fn find_by_id(
        &self,
        _id: Uuid,
    ) -> Result<Option<CountPeriod>, CountPeriodRepositoryError> {
        Ok(None)
    }

    async fn list_newest_first(&self) -> Result<Vec<CountPeriod>, CountPeriodRepositoryError> {
        Ok(Vec::new())
    }

    async fn active_newest_first(&self) -> Result<Vec<CountPeriod>, CountPeriodRepositoryError> {
        Ok(Vec::new())
    }
}
