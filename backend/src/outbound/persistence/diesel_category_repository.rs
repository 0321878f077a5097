//! PostgreSQL-backed `CategoryRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::Category;

use super::diesel_helpers::DbError;
use super::models::{CategoryRow, NewCategoryRow};
use super::pool::DbPool;
use super::schema::categories;

/// Diesel-backed implementation of the `CategoryRepository` port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_db(error: DbError) -> CategoryRepositoryError {
    match error {
        DbError::Connection(message) => CategoryRepositoryError::connection(message),
        DbError::Unique(message) => CategoryRepositoryError::duplicate_name(message),
        DbError::Query(message) => CategoryRepositoryError::query(message),
    }
}

fn pool_err(error: super::pool::PoolError) -> CategoryRepositoryError {
    map_db(DbError::from_pool(error))
}

fn diesel_err(error: diesel::result::Error) -> CategoryRepositoryError {
    map_db(DbError::from_diesel(error))
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn list_by_name(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order_by(categories::name.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(rows.into_iter().map(CategoryRow::into_domain).collect())
    }

    async fn insert(&self, category: &Category) -> Result<(), CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(categories::table)
            .values(&NewCategoryRow {
                id: category.id,
                name: &category.name,
                description: category.description.as_deref(),
                created_at: category.created_at,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let deleted = diesel::delete(categories::table.filter(categories::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(deleted > 0)
    }
}
