//! Port for delivering one-time login codes.

use async_trait::async_trait;

use crate::domain::auth::LoginCode;
use crate::domain::user::EmailAddress;

/// Errors raised by code-delivery adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeMailerError {
    /// The message could not be handed to the delivery channel.
    #[error("login code delivery failed: {message}")]
    Delivery {
        /// Adapter-provided context.
        message: String,
    },
}

impl CodeMailerError {
    /// Create a delivery error with the given message.
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }
}

/// Port for sending a login code to a user's mailbox.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeMailer: Send + Sync {
    /// Deliver the code to the given address.
    async fn send_login_code(
        &self,
        recipient: &EmailAddress,
        code: &LoginCode,
    ) -> Result<(), CodeMailerError>;
}

/// Fixture mailer that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCodeMailer;

#[async_trait]
impl CodeMailer for FixtureCodeMailer {
    async fn send_login_code(
        &self,
        _recipient: &EmailAddress,
        _code: &LoginCode,
    ) -> Result<(), CodeMailerError> {
        Ok(())
    }
}
