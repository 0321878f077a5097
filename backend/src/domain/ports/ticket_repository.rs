//! Port for helpdesk ticket persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::tickets::{Ticket, TicketStatus, TicketView};
use crate::domain::user::EmailAddress;

/// Errors raised by ticket repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketRepositoryError {
    /// Repository connection could not be established.
    #[error("ticket repository connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("ticket repository query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
}

impl TicketRepositoryError {
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

/// Port for ticket storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Persist a new ticket.
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError>;

    /// The reporting user's tickets, newest first, with item display fields.
    async fn list_for_user(
        &self,
        user: &EmailAddress,
    ) -> Result<Vec<TicketView>, TicketRepositoryError>;

    /// Every ticket, newest first, with item display fields.
    async fn list_all(&self) -> Result<Vec<TicketView>, TicketRepositoryError>;

    /// Change a ticket's workflow status. Returns `Ok(false)` when no row
    /// matched.
    async fn update_status(
        &self,
        id: Uuid,
        status: TicketStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TicketRepositoryError>;
}

/// Fixture implementation for tests that do not exercise ticket storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketRepository;

#[async_trait]
impl TicketRepository for FixtureTicketRepository {
    async fn insert(&self, _ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        Ok(())
    }

    async fn list_for_user(
        &self,
        _user: &EmailAddress,
    ) -> Result<Vec<TicketView>, TicketRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<TicketView>, TicketRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_status(
        &self,
        _id: Uuid,
        _status: TicketStatus,
        _updated_at: DateTime<Utc>,
    ) -> Result<bool, TicketRepositoryError> {
        Ok(false)
    }
}
