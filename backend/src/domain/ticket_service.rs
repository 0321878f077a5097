//! Helpdesk ticket service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::ports::{
    CreateTicketRequest, TicketOps, TicketRepository, TicketRepositoryError,
};
use crate::domain::tickets::{Ticket, TicketStatus, TicketView};
use crate::domain::user::EmailAddress;

/// Ticket service implementing the driving port.
#[derive(Clone)]
pub struct TicketService<T> {
    tickets: Arc<T>,
}

impl<T> TicketService<T> {
    /// Create a new service over the given repository.
    pub fn new(tickets: Arc<T>) -> Self {
        Self { tickets }
    }
}

fn map_ticket_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ticket repository unavailable: {message}"))
        }
        TicketRepositoryError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
    }
}

#[async_trait]
impl<T> TicketOps for TicketService<T>
where
    T: TicketRepository,
{
    async fn create_ticket(&self, request: CreateTicketRequest) -> Result<Ticket, Error> {
        let title = request.title.trim().to_owned();
        if title.is_empty() {
            return Err(Error::invalid_request("ticket title must not be empty"));
        }
        let description = request.description.trim().to_owned();
        if description.is_empty() {
            return Err(Error::invalid_request("ticket description must not be empty"));
        }
        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            user_email: request.user_email,
            kind: request.kind,
            inventory_id: request.inventory_id,
            title,
            description,
            priority: request.priority,
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
        };
        self.tickets
            .insert(&ticket)
            .await
            .map_err(map_ticket_error)?;
        tracing::info!(ticket_id = %ticket.id, kind = %ticket.kind, "ticket raised");
        Ok(ticket)
    }

    async fn tickets_for(&self, user: &EmailAddress) -> Result<Vec<TicketView>, Error> {
        self.tickets
            .list_for_user(user)
            .await
            .map_err(map_ticket_error)
    }

    async fn all_tickets(&self) -> Result<Vec<TicketView>, Error> {
        self.tickets.list_all().await.map_err(map_ticket_error)
    }

    async fn update_status(&self, ticket_id: Uuid, status: TicketStatus) -> Result<(), Error> {
        let matched = self
            .tickets
            .update_status(ticket_id, status, Utc::now())
            .await
            .map_err(map_ticket_error)?;
        if !matched {
            return Err(Error::not_found("ticket not found"));
        }
        tracing::info!(ticket_id = %ticket_id, status = %status, "ticket status changed");
        Ok(())
    }
}
