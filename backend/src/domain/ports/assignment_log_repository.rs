//! Port for the append-only assignment history log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::inventory::AssignmentEvent;
use crate::domain::user::EmailAddress;

/// Errors raised by assignment-log repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentLogRepositoryError {
    /// Repository connection could not be established.
    #[error("assignment log connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("assignment log query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
}

impl AssignmentLogRepositoryError {
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

/// Port for recording assignment history.
///
/// Records are append-only: the only mutation is stamping `unassigned_at`
/// on the open record when an item changes hands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentLogRepository: Send + Sync {
    /// Append a history record.
    async fn append(&self, event: &AssignmentEvent) -> Result<(), AssignmentLogRepositoryError>;

    /// Stamp `unassigned_at` on the open record for the given item and
    /// holder. Returns `Ok(false)` when no open record matched.
    async fn close_open(
        &self,
        inventory_id: Uuid,
        user: &EmailAddress,
        unassigned_at: DateTime<Utc>,
    ) -> Result<bool, AssignmentLogRepositoryError>;
}

/// Fixture implementation for tests that ignore assignment history.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAssignmentLogRepository;

#[async_trait]
impl AssignmentLogRepository for FixtureAssignmentLogRepository {
    async fn append(&self, _event: &AssignmentEvent) -> Result<(), AssignmentLogRepositoryError> {
        Ok(())
    }

    async fn close_open(
        &self,
        _inventory_id: Uuid,
        _user: &EmailAddress,
        _unassigned_at: DateTime<Utc>,
    ) -> Result<bool, AssignmentLogRepositoryError> {
        Ok(false)
    }
}
