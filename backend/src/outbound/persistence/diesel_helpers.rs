//! Shared error classification for Diesel repository adapters.
//!
//! Each repository port carries its own error enum, so adapters cannot share
//! one mapping function. Instead, Diesel and pool failures are first
//! classified into [`DbError`], and each adapter folds that into its port's
//! error type (unique violations become the port's duplicate variant, or a
//! plain query error for ports without one).

use tracing::debug;

use super::pool::PoolError;

/// Backend-neutral classification of a persistence failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbError {
    /// The pool or the connection itself failed.
    Connection(String),
    /// A unique constraint was violated.
    Unique(String),
    /// Any other query or execution failure.
    Query(String),
}

impl DbError {
    /// Classify a pool failure.
    pub(crate) fn from_pool(error: PoolError) -> Self {
        let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
        Self::Connection(message)
    }

    /// Classify a Diesel failure, emitting debug context for diagnosis.
    pub(crate) fn from_diesel(error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                debug!(message = info.message(), "unique constraint violated");
                Self::Unique(info.message().to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                debug!(message = info.message(), "database connection lost");
                Self::Connection("database connection error".to_owned())
            }
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
                Self::Query("database error".to_owned())
            }
            other => {
                debug!(
                    error_type = %std::any::type_name_of_val(&other),
                    "diesel operation failed"
                );
                Self::Query("database error".to_owned())
            }
        }
    }

    /// Classify a stored-row conversion failure.
    pub(crate) fn invalid_row(message: String) -> Self {
        debug!(%message, "stored row failed domain conversion");
        Self::Query(message)
    }
}

/// Collect row conversion results, classifying the first failure.
pub(crate) fn collect_rows<T>(
    results: impl Iterator<Item = Result<T, String>>,
) -> Result<Vec<T>, DbError> {
    results
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::invalid_row)
}
