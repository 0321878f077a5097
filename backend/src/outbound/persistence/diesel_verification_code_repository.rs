//! PostgreSQL-backed `VerificationCodeRepository` implementation.
//!
//! Stores login codes as fingerprints only. Retiring, lookup, and consume
//! are all single statements so the database arbitrates concurrent logins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::auth::VerificationCode;
use crate::domain::ports::{VerificationCodeRepository, VerificationCodeRepositoryError};
use crate::domain::EmailAddress;

use super::diesel_helpers::DbError;
use super::models::{NewVerificationCodeRow, VerificationCodeRow};
use super::pool::DbPool;
use super::schema::verification_codes;

/// Diesel-backed implementation of the `VerificationCodeRepository` port.
#[derive(Clone)]
pub struct DieselVerificationCodeRepository {
    pool: DbPool,
}

impl DieselVerificationCodeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_db(error: DbError) -> VerificationCodeRepositoryError {
    match error {
        DbError::Connection(message) => VerificationCodeRepositoryError::connection(message),
        DbError::Unique(message) | DbError::Query(message) => {
            VerificationCodeRepositoryError::query(message)
        }
    }
}

fn pool_err(error: super::pool::PoolError) -> VerificationCodeRepositoryError {
    map_db(DbError::from_pool(error))
}

fn diesel_err(error: diesel::result::Error) -> VerificationCodeRepositoryError {
    map_db(DbError::from_diesel(error))
}

#[async_trait]
impl VerificationCodeRepository for DieselVerificationCodeRepository {
    async fn invalidate_for(
        &self,
        email: &EmailAddress,
    ) -> Result<u64, VerificationCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let retired = diesel::update(
            verification_codes::table.filter(
                verification_codes::email
                    .eq(email.as_str())
                    .and(verification_codes::used.eq(false)),
            ),
        )
        .set(verification_codes::used.eq(true))
        .execute(&mut conn)
        .await
        .map_err(diesel_err)?;
        Ok(retired as u64)
    }

    async fn insert(
        &self,
        code: &VerificationCode,
    ) -> Result<(), VerificationCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(verification_codes::table)
            .values(&NewVerificationCodeRow {
                id: code.id,
                email: code.email.as_str(),
                fingerprint: &code.fingerprint,
                expires_at: code.expires_at,
                used: code.used,
                created_at: code.created_at,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(())
    }

    async fn find_valid(
        &self,
        email: &EmailAddress,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, VerificationCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row: Option<VerificationCodeRow> = verification_codes::table
            .filter(
                verification_codes::email
                    .eq(email.as_str())
                    .and(verification_codes::fingerprint.eq(fingerprint))
                    .and(verification_codes::used.eq(false))
                    .and(verification_codes::expires_at.gt(now)),
            )
            .select(VerificationCodeRow::as_select())
            .order_by(verification_codes::created_at.desc())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?;
        row.map(|row| row.into_domain().map_err(|msg| map_db(DbError::invalid_row(msg))))
            .transpose()
    }

    async fn mark_used(&self, id: Uuid) -> Result<bool, VerificationCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        // Filtered on `used = false` so only one concurrent login can win.
        let updated = diesel::update(
            verification_codes::table.filter(
                verification_codes::id
                    .eq(id)
                    .and(verification_codes::used.eq(false)),
            ),
        )
        .set(verification_codes::used.eq(true))
        .execute(&mut conn)
        .await
        .map_err(diesel_err)?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unique_violations_fold_into_query_errors() {
        let err = map_db(DbError::Unique("verification_codes_pkey".into()));
        assert!(matches!(
            err,
            VerificationCodeRepositoryError::Query { .. }
        ));
    }
}
