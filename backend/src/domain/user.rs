//! User identity primitives and the user account entity.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain error returned when identity values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// Email address was missing or blank once trimmed.
    #[error("email address must not be empty")]
    EmptyEmail,
    /// Email address lacks the basic `local@domain` shape.
    #[error("email address is malformed: {0}")]
    MalformedEmail(String),
    /// Role string is not one of the enumerated roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Validated, lower-cased email address used as the user key.
///
/// ## Invariants
/// - Trimmed, non-empty, and contains exactly one `@` separating a non-empty
///   local part from a non-empty domain.
/// - Stored lower-cased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Construct an address from a raw string, validating its shape.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        let mut parts = normalized.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(IdentityValidationError::MalformedEmail(normalized));
        }
        Ok(Self(normalized))
    }

    /// Address string suitable for lookups and display.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Access role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user: own tickets, own inventory, own count submissions.
    User,
    /// Administrator: full management surface.
    Admin,
}

impl Role {
    /// Stable string form stored in the database and the session.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = IdentityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(IdentityValidationError::UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Primary identifier.
    pub id: Uuid,
    /// Unique login address.
    pub email: EmailAddress,
    /// Access role.
    pub role: Role,
    /// Inactive users cannot request login codes.
    pub is_active: bool,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Identity attached to an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account identifier, used for self-modification guards.
    pub id: Uuid,
    /// Login address.
    pub email: EmailAddress,
    /// Access role.
    pub role: Role,
}
