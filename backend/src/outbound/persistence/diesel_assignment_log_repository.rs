//! PostgreSQL-backed `AssignmentLogRepository` implementation.
//!
//! The log is append-only; the only mutation stamps `unassigned_at` on the
//! open record when an item changes hands.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::inventory::AssignmentEvent;
use crate::domain::ports::{AssignmentLogRepository, AssignmentLogRepositoryError};
use crate::domain::EmailAddress;

use super::diesel_helpers::DbError;
use super::models::NewAssignmentRow;
use super::pool::DbPool;
use super::schema::inventory_assignments;

/// Diesel-backed implementation of the `AssignmentLogRepository` port.
#[derive(Clone)]
pub struct DieselAssignmentLogRepository {
    pool: DbPool,
}

impl DieselAssignmentLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_db(error: DbError) -> AssignmentLogRepositoryError {
    match error {
        DbError::Connection(message) => AssignmentLogRepositoryError::connection(message),
        DbError::Unique(message) | DbError::Query(message) => {
            AssignmentLogRepositoryError::query(message)
        }
    }
}

fn pool_err(error: super::pool::PoolError) -> AssignmentLogRepositoryError {
    map_db(DbError::from_pool(error))
}

fn diesel_err(error: diesel::result::Error) -> AssignmentLogRepositoryError {
    map_db(DbError::from_diesel(error))
}

#[async_trait]
impl AssignmentLogRepository for DieselAssignmentLogRepository {
    async fn append(&self, event: &AssignmentEvent) -> Result<(), AssignmentLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(inventory_assignments::table)
            .values(&NewAssignmentRow::from_event(event))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(())
    }

    async fn close_open(
        &self,
        inventory_id: Uuid,
        user: &EmailAddress,
        unassigned_at: DateTime<Utc>,
    ) -> Result<bool, AssignmentLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let closed = diesel::update(
            inventory_assignments::table.filter(
                inventory_assignments::inventory_id
                    .eq(inventory_id)
                    .and(inventory_assignments::user_email.eq(user.as_str()))
                    .and(inventory_assignments::unassigned_at.is_null()),
            ),
        )
        .set(inventory_assignments::unassigned_at.eq(unassigned_at))
        .execute(&mut conn)
        .await
        .map_err(diesel_err)?;
        Ok(closed > 0)
    }
}
