//! PostgreSQL-backed `TicketRepository` implementation.
//!
//! Listings left-join the inventory table so tickets keep rendering after
//! the item they reference is deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::tickets::{Ticket, TicketStatus, TicketView};
use crate::domain::EmailAddress;

use super::diesel_helpers::{collect_rows, DbError};
use super::models::{NewTicketRow, TicketRow};
use super::pool::DbPool;
use super::schema::{inventory, tickets};

/// Diesel-backed implementation of the `TicketRepository` port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_db(error: DbError) -> TicketRepositoryError {
    match error {
        DbError::Connection(message) => TicketRepositoryError::connection(message),
        DbError::Unique(message) | DbError::Query(message) => {
            TicketRepositoryError::query(message)
        }
    }
}

fn pool_err(error: super::pool::PoolError) -> TicketRepositoryError {
    map_db(DbError::from_pool(error))
}

fn diesel_err(error: diesel::result::Error) -> TicketRepositoryError {
    map_db(DbError::from_diesel(error))
}

type JoinedRow = (TicketRow, Option<String>, Option<String>);

fn view_from((row, product_name, product_serial): JoinedRow) -> Result<TicketView, String> {
    Ok(TicketView {
        ticket: row.into_domain()?,
        product_name,
        product_serial,
    })
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(tickets::table)
            .values(&NewTicketRow {
                id: ticket.id,
                user_email: ticket.user_email.as_str(),
                kind: ticket.kind.as_str(),
                inventory_id: ticket.inventory_id,
                title: &ticket.title,
                description: &ticket.description,
                priority: ticket.priority.as_str(),
                status: ticket.status.as_str(),
                created_at: ticket.created_at,
                updated_at: ticket.updated_at,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user: &EmailAddress,
    ) -> Result<Vec<TicketView>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<JoinedRow> = tickets::table
            .left_join(inventory::table)
            .filter(tickets::user_email.eq(user.as_str()))
            .select((
                TicketRow::as_select(),
                inventory::product_name.nullable(),
                inventory::serial_code.nullable(),
            ))
            .order_by(tickets::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        collect_rows(rows.into_iter().map(view_from)).map_err(map_db)
    }

    async fn list_all(&self) -> Result<Vec<TicketView>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<JoinedRow> = tickets::table
            .left_join(inventory::table)
            .select((
                TicketRow::as_select(),
                inventory::product_name.nullable(),
                inventory::serial_code.nullable(),
            ))
            .order_by(tickets::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        collect_rows(rows.into_iter().map(view_from)).map_err(map_db)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: TicketStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let updated = diesel::update(tickets::table.filter(tickets::id.eq(id)))
            .set((
                tickets::status.eq(status.as_str()),
                tickets::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(updated > 0)
    }
}
