//! Port for user-account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::{EmailAddress, Role, User};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
    /// Insert violated the email uniqueness constraint.
    #[error("email already registered: {message}")]
    DuplicateEmail {
        /// Adapter-provided context.
        message: String,
    },
}

impl UserRepositoryError {
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

    /// Create a duplicate-email error with the given message.
    pub fn duplicate_email(message: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            message: message.into(),
        }
    }
}

/// Port for user-account storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch an account by email, only when `is_active` is set.
    async fn find_active_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an account by email regardless of active state.
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError>;

    /// Persist a new account.
    ///
    /// Fails with [`UserRepositoryError::DuplicateEmail`] when the address is
    /// already registered.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Every account, newest first.
    async fn list_newest_first(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Change an account's role. Returns `Ok(false)` when no row matched.
    async fn update_role(&self, id: Uuid, role: Role) -> Result<bool, UserRepositoryError>;

    /// Enable or disable an account. Returns `Ok(false)` when no row matched.
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, UserRepositoryError>;

    /// Delete an account. Returns `Ok(false)` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise account storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_active_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_role(&self, _id: Uuid, _role: Role) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn set_active(&self, _id: Uuid, _is_active: bool) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }
}
