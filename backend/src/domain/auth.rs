//! Passwordless email authentication.
//!
//! Login is a two-step exchange: the user requests a six-digit code which is
//! mailed to their registered address, then presents it within ten minutes
//! to establish a session. Codes are single use and each issue retires the
//! address's earlier codes. Only the code's SHA-256 fingerprint is ever
//! persisted; the digits live briefly in memory and are zeroised on drop.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;
use zeroize::Zeroizing;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::ports::{
    CodeMailer, CodeMailerError, LoginFlow, UserRepository, UserRepositoryError,
    VerificationCodeRepository, VerificationCodeRepositoryError,
};
use crate::domain::user::{AuthenticatedUser, EmailAddress, User};

/// How long an issued code remains valid.
pub fn code_validity() -> Duration {
    Duration::minutes(10)
}

/// A six-digit one-time login code.
///
/// The digits are wrapped in [`Zeroizing`] so they are wiped from memory
/// when the code is dropped. Persistence and lookup use
/// [`LoginCode::fingerprint`] instead of the digits.
#[derive(Debug, Clone)]
pub struct LoginCode(Zeroizing<String>);

impl LoginCode {
    /// Generate a fresh random code.
    pub fn generate() -> Self {
        let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
        Self(Zeroizing::new(format!("{value:06}")))
    }

    /// Wrap user-supplied digits for verification.
    pub fn from_input(raw: &str) -> Self {
        Self(Zeroizing::new(raw.trim().to_owned()))
    }

    /// The digits, for embedding in the outgoing mail.
    pub fn digits(&self) -> &str {
        self.0.as_str()
    }

    /// Hex-encoded SHA-256 of the digits; this is what the store sees.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

/// A stored one-time code issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode {
    /// Primary identifier.
    pub id: Uuid,
    /// The address the code was issued to.
    pub email: EmailAddress,
    /// SHA-256 fingerprint of the digits.
    pub fingerprint: String,
    /// Instant after which the code is rejected.
    pub expires_at: DateTime<Utc>,
    /// Whether the code has been consumed or retired.
    pub used: bool,
    /// Issue timestamp.
    pub created_at: DateTime<Utc>,
}

/// Login-flow service implementing the driving port.
#[derive(Clone)]
pub struct LoginCodeService<U, V, M> {
    users: Arc<U>,
    codes: Arc<V>,
    mailer: Arc<M>,
}

impl<U, V, M> LoginCodeService<U, V, M> {
    /// Create a new service over the given collaborators.
    pub fn new(users: Arc<U>, codes: Arc<V>, mailer: Arc<M>) -> Self {
        Self {
            users,
            codes,
            mailer,
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message }
        | UserRepositoryError::DuplicateEmail { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_code_error(error: VerificationCodeRepositoryError) -> Error {
    match error {
        VerificationCodeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("verification code store unavailable: {message}"))
        }
        VerificationCodeRepositoryError::Query { message } => {
            Error::internal(format!("verification code store error: {message}"))
        }
    }
}

fn map_mailer_error(error: CodeMailerError) -> Error {
    match error {
        CodeMailerError::Delivery { message } => {
            Error::service_unavailable(format!("could not deliver login code: {message}"))
        }
    }
}

impl<U, V, M> LoginCodeService<U, V, M>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    M: CodeMailer,
{
    async fn active_account(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        self.users
            .find_active_by_email(email)
            .await
            .map_err(map_user_error)
    }
}

#[async_trait]
impl<U, V, M> LoginFlow for LoginCodeService<U, V, M>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    M: CodeMailer,
{
    async fn send_code(&self, email: &EmailAddress) -> Result<(), Error> {
        if self.active_account(email).await?.is_none() {
            return Err(Error::not_found(
                "this email address is not registered for access",
            ));
        }
        let retired = self
            .codes
            .invalidate_for(email)
            .await
            .map_err(map_code_error)?;
        if retired > 0 {
            tracing::debug!(retired, "retired outstanding login codes");
        }
        let code = LoginCode::generate();
        let now = Utc::now();
        let record = VerificationCode {
            id: Uuid::new_v4(),
            email: email.clone(),
            fingerprint: code.fingerprint(),
            expires_at: now + code_validity(),
            used: false,
            created_at: now,
        };
        self.codes.insert(&record).await.map_err(map_code_error)?;
        self.mailer
            .send_login_code(email, &code)
            .await
            .map_err(map_mailer_error)?;
        tracing::info!(email = %email, "login code issued");
        Ok(())
    }

    async fn verify_code(
        &self,
        email: &EmailAddress,
        code: &str,
    ) -> Result<AuthenticatedUser, Error> {
        let presented = LoginCode::from_input(code);
        let now = Utc::now();
        let record = self
            .codes
            .find_valid(email, &presented.fingerprint(), now)
            .await
            .map_err(map_code_error)?
            .ok_or_else(|| Error::unauthorized("invalid or expired code"))?;
        let consumed = self
            .codes
            .mark_used(record.id)
            .await
            .map_err(map_code_error)?;
        if !consumed {
            // Another concurrent verify got there first.
            return Err(Error::unauthorized("invalid or expired code"));
        }
        let account = self
            .active_account(email)
            .await?
            .ok_or_else(|| Error::forbidden("this account has been deactivated"))?;
        tracing::info!(email = %email, "login code verified");
        Ok(AuthenticatedUser {
            id: account.id,
            email: account.email,
            role: account.role,
        })
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
