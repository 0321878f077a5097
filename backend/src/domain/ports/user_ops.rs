//! Driving ports for authentication and user administration.
//!
//! [`LoginFlow`] is the passwordless email login: request a one-time code,
//! then exchange it for an authenticated identity. [`UserAdmin`] covers the
//! administrator's account registry, including the self-modification guards.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::user::{AuthenticatedUser, EmailAddress, Role, User};

/// Request to change an account, carrying the acting administrator so
/// self-modification can be refused.
#[derive(Debug, Clone)]
pub struct AccountChangeRequest {
    /// The account to change.
    pub target_id: Uuid,
    /// The administrator performing the change.
    pub actor_id: Uuid,
}

/// Driving port for the passwordless login flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginFlow: Send + Sync {
    /// Issue a one-time code to the address and deliver it by mail.
    ///
    /// Previously issued codes for the address are retired first.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no active account carries the address.
    async fn send_code(&self, email: &EmailAddress) -> Result<(), Error>;

    /// Exchange a code for an authenticated identity, consuming the code.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized error when the code is wrong, expired, or
    /// already used.
    async fn verify_code(
        &self,
        email: &EmailAddress,
        code: &str,
    ) -> Result<AuthenticatedUser, Error>;
}

/// Driving port for the user-account registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdmin: Send + Sync {
    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error when the address is already
    /// registered.
    async fn add_user(&self, email: EmailAddress, role: Role) -> Result<User, Error>;

    /// Every account, newest first.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Change an account's role.
    ///
    /// # Errors
    ///
    /// Returns a forbidden error when the target is the acting
    /// administrator and a not-found error when no account matches.
    async fn update_role(&self, request: AccountChangeRequest, role: Role) -> Result<(), Error>;

    /// Enable or disable an account, with the same self-guard as
    /// [`UserAdmin::update_role`].
    async fn update_active(
        &self,
        request: AccountChangeRequest,
        is_active: bool,
    ) -> Result<(), Error>;

    /// Delete an account, releasing any equipment assigned to it.
    ///
    /// # Errors
    ///
    /// Returns a forbidden error when the target is the acting
    /// administrator and a not-found error when no account matches.
    async fn delete_user(&self, request: AccountChangeRequest) -> Result<(), Error>;
}

/// Fixture login flow that accepts nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginFlow;

#[async_trait]
impl LoginFlow for FixtureLoginFlow {
    async fn send_code(&self, _email: &EmailAddress) -> Result<(), Error> {
        Ok(())
    }

    async fn verify_code(
        &self,
        _email: &EmailAddress,
        _code: &str,
    ) -> Result<AuthenticatedUser, Error> {
        Err(Error::unauthorized("invalid or expired code"))
    }
}

/// Fixture registry with no accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserAdmin;

#[async_trait]
impl UserAdmin for FixtureUserAdmin {
    async fn add_user(&self, _email: EmailAddress, _role: Role) -> Result<User, Error> {
        Err(Error::internal("user fixture has no storage"))
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(Vec::new())
    }

    async fn update_role(&self, _request: AccountChangeRequest, _role: Role) -> Result<(), Error> {
        Err(Error::not_found("user not found"))
    }

    async fn update_active(
        &self,
        _request: AccountChangeRequest,
        _is_active: bool,
    ) -> Result<(), Error> {
        Err(Error::not_found("user not found"))
    }

    async fn delete_user(&self, _request: AccountChangeRequest) -> Result<(), Error> {
        Err(Error::not_found("user not found"))
    }
}
