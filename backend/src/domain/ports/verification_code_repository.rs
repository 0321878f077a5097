//! Port for one-time login code persistence.
//!
//! Codes are stored as fingerprints, never as the digits themselves; see
//! [`crate::domain::auth::LoginCode`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::auth::VerificationCode;
use crate::domain::user::EmailAddress;

/// Errors raised by verification-code repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationCodeRepositoryError {
    /// Repository connection could not be established.
    #[error("verification code repository connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("verification code repository query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
}

impl VerificationCodeRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for one-time login code storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Mark every outstanding unused code for the address as used.
    ///
    /// Issuing a fresh code always retires its predecessors; returns the
    /// number of codes retired.
    async fn invalidate_for(
        &self,
        email: &EmailAddress,
    ) -> Result<u64, VerificationCodeRepositoryError>;

    /// Persist a freshly issued code.
    async fn insert(&self, code: &VerificationCode)
        -> Result<(), VerificationCodeRepositoryError>;

    /// Fetch the unused, unexpired code matching the address and fingerprint.
    async fn find_valid(
        &self,
        email: &EmailAddress,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, VerificationCodeRepositoryError>;

    /// Consume a code. Returns `Ok(false)` when no row matched.
    async fn mark_used(&self, id: Uuid) -> Result<bool, VerificationCodeRepositoryError>;
}

/// Fixture implementation for tests that do not exercise code storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVerificationCodeRepository;

#[async_trait]
impl VerificationCodeRepository for FixtureVerificationCodeRepository {
    async fn invalidate_for(
        &self,
        _email: &EmailAddress,
    ) -> Result<u64, VerificationCodeRepositoryError> {
        Ok(0)
    }

    async fn insert(
        &self,
        _code: &VerificationCode,
    ) -> Result<(), VerificationCodeRepositoryError> {
        Ok(())
    }

    async fn find_valid(
        &self,
        _email: &EmailAddress,
        _fingerprint: &str,
        _now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, VerificationCodeRepositoryError> {
        Ok(None)
    }

    async fn mark_used(&self, _id: Uuid) -> Result<bool, VerificationCodeRepositoryError> {
        Ok(false)
    }
}
