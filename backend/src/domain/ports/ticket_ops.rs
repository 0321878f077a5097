//! Driving port for helpdesk tickets.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::tickets::{Ticket, TicketKind, TicketPriority, TicketStatus, TicketView};
use crate::domain::user::EmailAddress;

/// Request to raise a ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketRequest {
    /// The reporting user.
    pub user_email: EmailAddress,
    /// What the ticket is about.
    pub kind: TicketKind,
    /// The affected item, when the ticket concerns one.
    pub inventory_id: Option<Uuid>,
    /// One-line summary; must not be blank.
    pub title: String,
    /// The reporter's description; must not be blank.
    pub description: String,
    /// Reporter-assigned urgency.
    pub priority: TicketPriority,
}

/// Driving port for ticket operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketOps: Send + Sync {
    /// Raise a new ticket with status `open`.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error when the title or description is
    /// blank.
    async fn create_ticket(&self, request: CreateTicketRequest) -> Result<Ticket, Error>;

    /// The caller's tickets, newest first.
    async fn tickets_for(&self, user: &EmailAddress) -> Result<Vec<TicketView>, Error>;

    /// Every ticket, newest first, for administrators.
    async fn all_tickets(&self) -> Result<Vec<TicketView>, Error>;

    /// Move a ticket to a new workflow status.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no ticket carries the identifier.
    async fn update_status(&self, ticket_id: Uuid, status: TicketStatus) -> Result<(), Error>;
}

/// Fixture implementation with no tickets.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketOps;

#[async_trait]
impl TicketOps for FixtureTicketOps {
    async fn create_ticket(&self, _request: CreateTicketRequest) -> Result<Ticket, Error> {
        Err(Error::internal("ticket fixture has no storage"))
    }

    async fn tickets_for(&self, _user: &EmailAddress) -> Result<Vec<TicketView>, Error> {
        Ok(Vec::new())
    }

    async fn all_tickets(&self) -> Result<Vec<TicketView>, Error> {
        Ok(Vec::new())
    }

    async fn update_status(&self, _ticket_id: Uuid, _status: TicketStatus) -> Result<(), Error> {
        Err(Error::not_found("ticket not found"))
    }
}
