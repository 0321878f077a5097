//! PostgreSQL-backed `CountSubmissionRepository` implementation.
//!
//! The unique constraint on (`user_email`, `period_id`) is the final
//! arbiter under concurrent saves; draft mutations are filtered on
//! `status = 'draft'` so a row that concurrently became terminal is never
//! touched.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::counting::CountSubmission;
use crate::domain::ports::{CountSubmissionRepository, CountSubmissionRepositoryError};
use crate::domain::EmailAddress;

use super::diesel_helpers::{collect_rows, DbError};
use super::models::{CountSubmissionRow, CountSubmissionUpdate, NewCountSubmissionRow};
use super::pool::DbPool;
use super::schema::count_submissions;

/// Diesel-backed implementation of the `CountSubmissionRepository` port.
#[derive(Clone)]
pub struct DieselCountSubmissionRepository {
    pool: DbPool,
}

impl DieselCountSubmissionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_db(error: DbError) -> CountSubmissionRepositoryError {
    match error {
        DbError::Connection(message) => CountSubmissionRepositoryError::connection(message),
        DbError::Unique(message) => CountSubmissionRepositoryError::duplicate_submission(message),
        DbError::Query(message) => CountSubmissionRepositoryError::query(message),
    }
}

fn pool_err(error: super::pool::PoolError) -> CountSubmissionRepositoryError {
    map_db(DbError::from_pool(error))
}

fn diesel_err(error: diesel::result::Error) -> CountSubmissionRepositoryError {
    map_db(DbError::from_diesel(error))
}

fn sheet_json(
    submission: &CountSubmission,
) -> Result<serde_json::Value, CountSubmissionRepositoryError> {
    serde_json::to_value(&submission.sheet)
        .map_err(|err| CountSubmissionRepositoryError::query(format!("sheet serialisation: {err}")))
}

#[async_trait]
impl CountSubmissionRepository for DieselCountSubmissionRepository {
    async fn find_by_user_and_period(
        &self,
        user: &EmailAddress,
        period_id: Uuid,
    ) -> Result<Option<CountSubmission>, CountSubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row: Option<CountSubmissionRow> = count_submissions::table
            .filter(
                count_submissions::user_email
                    .eq(user.as_str())
                    .and(count_submissions::period_id.eq(period_id)),
            )
            .select(CountSubmissionRow::as_select())
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

    async fn insert(
        &self,
        submission: &CountSubmission,
    ) -> Result<(), CountSubmissionRepositoryError> {
        let sheet = sheet_json(submission)?;
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(count_submissions::table)
            .values(&NewCountSubmissionRow {
                id: submission.id,
                user_email: submission.user_email.as_str(),
                period_id: submission.period_id,
                sheet: &sheet,
                status: submission.status.as_str(),
                submitted_at: submission.submitted_at,
                created_at: submission.created_at,
                updated_at: submission.updated_at,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(())
    }

    async fn update_draft(
        &self,
        submission: &CountSubmission,
    ) -> Result<bool, CountSubmissionRepositoryError> {
        let sheet = sheet_json(submission)?;
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let updated = diesel::update(
            count_submissions::table.filter(
                count_submissions::id
                    .eq(submission.id)
                    .and(count_submissions::status.eq("draft")),
            ),
        )
        .set(&CountSubmissionUpdate {
            sheet: &sheet,
            status: submission.status.as_str(),
            submitted_at: submission.submitted_at,
            updated_at: submission.updated_at,
        })
        .execute(&mut conn)
        .await
        .map_err(diesel_err)?;
        Ok(updated > 0)
    }

    async fn delete_draft(
        &self,
        user: &EmailAddress,
        period_id: Uuid,
    ) -> Result<bool, CountSubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let deleted = diesel::delete(
            count_submissions::table.filter(
                count_submissions::user_email
                    .eq(user.as_str())
                    .and(count_submissions::period_id.eq(period_id))
                    .and(count_submissions::status.eq("draft")),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_err)?;
        Ok(deleted > 0)
    }

    async fn list_for_period(
        &self,
        period_id: Uuid,
    ) -> Result<Vec<CountSubmission>, CountSubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<CountSubmissionRow> = count_submissions::table
            .filter(count_submissions::period_id.eq(period_id))
            .select(CountSubmissionRow::as_select())
            .order_by(count_submissions::updated_at.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        collect_rows(rows.into_iter().map(CountSubmissionRow::into_domain)).map_err(map_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unique_violations_map_to_duplicate_submission() {
        let err = map_db(DbError::Unique(
            "count_submissions_user_email_period_id_key".into(),
        ));
        assert!(matches!(
            err,
            CountSubmissionRepositoryError::DuplicateSubmission { .. }
        ));
    }
}
