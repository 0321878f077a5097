//! PostgreSQL-backed `CountPeriodRepository` implementation.
//!
//! Listings order by `created_at` descending so callers applying the
//! recency rule can take the first row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::counting::{CountPeriod, PeriodChanges, PeriodStatus};
use crate::domain::ports::{CountPeriodRepository, CountPeriodRepositoryError};

use super::diesel_helpers::{collect_rows, DbError};
use super::models::{CountPeriodRow, CountPeriodUpdate, NewCountPeriodRow};
use super::pool::DbPool;
use super::schema::count_periods;

/// Diesel-backed implementation of the `CountPeriodRepository` port.
#[derive(Clone)]
pub struct DieselCountPeriodRepository {
    pool: DbPool,
}

impl DieselCountPeriodRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_db(error: DbError) -> CountPeriodRepositoryError {
    match error {
        DbError::Connection(message) => CountPeriodRepositoryError::connection(message),
        DbError::Unique(message) | DbError::Query(message) => {
            CountPeriodRepositoryError::query(message)
        }
    }
}

fn pool_err(error: super::pool::PoolError) -> CountPeriodRepositoryError {
    map_db(DbError::from_pool(error))
}

fn diesel_err(error: diesel::result::Error) -> CountPeriodRepositoryError {
    map_db(DbError::from_diesel(error))
}

#[async_trait]
impl CountPeriodRepository for DieselCountPeriodRepository {
    async fn insert(&self, period: &CountPeriod) -> Result<(), CountPeriodRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(count_periods::table)
            .values(&NewCountPeriodRow {
                id: period.id,
                name: &period.name,
                description: &period.description,
                start_date: period.start_date,
                end_date: period.end_date,
                status: period.status.as_str(),
                created_by: period.created_by.as_str(),
                created_at: period.created_at,
                updated_at: period.updated_at,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &PeriodChanges,
    ) -> Result<bool, CountPeriodRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let updated = diesel::update(count_periods::table.filter(count_periods::id.eq(id)))
            .set(&CountPeriodUpdate {
                name: &changes.name,
                description: &changes.description,
                start_date: changes.start_date,
                end_date: changes.end_date,
                status: changes.status.map(PeriodStatus::as_str),
                updated_at: changes.updated_at,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CountPeriodRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let deleted = diesel::delete(count_periods::table.filter(count_periods::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<CountPeriod>, CountPeriodRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row: Option<CountPeriodRow> = count_periods::table
            .filter(count_periods::id.eq(id))
            .select(CountPeriodRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?;
        row.map(|row| {
            row.into_domain()
                .map_err(|msg| map_db(DbError::invalid_row(msg)))
        })
        .transpose()
    }

    async fn list_newest_first(&self) -> Result<Vec<CountPeriod>, CountPeriodRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<CountPeriodRow> = count_periods::table
            .select(CountPeriodRow::as_select())
            .order_by(count_periods::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        collect_rows(rows.into_iter().map(CountPeriodRow::into_domain)).map_err(map_db)
    }

    async fn active_newest_first(&self) -> Result<Vec<CountPeriod>, CountPeriodRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<CountPeriodRow> = count_periods::table
            .filter(count_periods::status.eq("active"))
            .select(CountPeriodRow::as_select())
            .order_by(count_periods::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        collect_rows(rows.into_iter().map(CountPeriodRow::into_domain)).map_err(map_db)
    }
}
