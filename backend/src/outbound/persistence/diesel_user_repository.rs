//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, Role, User};

use super::diesel_helpers::{collect_rows, DbError};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_db(error: DbError) -> UserRepositoryError {
    match error {
        DbError::Connection(message) => UserRepositoryError::connection(message),
        DbError::Unique(message) => UserRepositoryError::duplicate_email(message),
        DbError::Query(message) => UserRepositoryError::query(message),
    }
}

fn pool_err(error: super::pool::PoolError) -> UserRepositoryError {
    map_db(DbError::from_pool(error))
}

fn diesel_err(error: diesel::result::Error) -> UserRepositoryError {
    map_db(DbError::from_diesel(error))
}

fn row_err(message: String) -> UserRepositoryError {
    map_db(DbError::invalid_row(message))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_active_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row: Option<UserRow> = users::table
            .filter(
                users::email
                    .eq(email.as_str())
                    .and(users::is_active.eq(true)),
            )
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?;
        row.map(|row| row.into_domain().map_err(row_err)).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?;
        row.map(|row| row.into_domain().map_err(row_err)).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?;
        row.map(|row| row.into_domain().map_err(row_err)).transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: user.id,
                email: user.email.as_str(),
                role: user.role.as_str(),
                is_active: user.is_active,
                created_at: user.created_at,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        collect_rows(rows.into_iter().map(UserRow::into_domain)).map_err(map_db)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let updated = diesel::update(users::table.filter(users::id.eq(id)))
            .set(users::role.eq(role.as_str()))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(updated > 0)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let updated = diesel::update(users::table.filter(users::id.eq(id)))
            .set(users::is_active.eq(is_active))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let deleted = diesel::delete(users::table.filter(users::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unique_violations_map_to_duplicate_email() {
        let err = map_db(DbError::Unique("users_email_key".into()));
        assert!(matches!(err, UserRepositoryError::DuplicateEmail { .. }));
    }

    #[rstest]
    fn pool_failures_map_to_connection() {
        let err = pool_err(super::super::pool::PoolError::checkout("refused"));
        assert!(matches!(err, UserRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("refused"));
    }
}
