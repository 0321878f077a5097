//! Helpdesk tickets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::EmailAddress;

/// Domain error returned when ticket values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketValidationError {
    /// The title was missing or blank once trimmed.
    #[error("ticket title must not be empty")]
    EmptyTitle,
    /// The description was missing or blank once trimmed.
    #[error("ticket description must not be empty")]
    EmptyDescription,
    /// Ticket kind string is not one of the enumerated values.
    #[error("unknown ticket kind: {0}")]
    UnknownKind(String),
    /// Ticket status string is not one of the enumerated values.
    #[error("unknown ticket status: {0}")]
    UnknownStatus(String),
    /// Priority string is not one of the enumerated values.
    #[error("unknown ticket priority: {0}")]
    UnknownPriority(String),
}

/// What a ticket is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TicketKind {
    /// Broken or misbehaving equipment.
    Fault,
    /// A discrepancy raised during an inventory count.
    Count,
    /// A requested change to assigned equipment.
    Change,
    /// Anything else.
    General,
}

impl TicketKind {
    /// Stable string form stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fault => "fault",
            Self::Count => "count",
            Self::Change => "change",
            Self::General => "general",
        }
    }
}

impl FromStr for TicketKind {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fault" => Ok(Self::Fault),
            "count" => Ok(Self::Count),
            "change" => Ok(Self::Change),
            "general" => Ok(Self::General),
            other => Err(TicketValidationError::UnknownKind(other.to_owned())),
        }
    }
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly raised, nobody working on it yet.
    Open,
    /// An administrator is working on it.
    InProgress,
    /// Resolved or dismissed.
    Closed,
}

impl TicketStatus {
    /// Stable string form stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            other => Err(TicketValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency assigned by the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    /// Can wait.
    Low,
    /// Default urgency.
    Normal,
    /// Should be looked at soon.
    High,
    /// Blocking the reporter's work.
    Urgent,
}

impl TicketPriority {
    /// Stable string form stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl FromStr for TicketPriority {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(TicketValidationError::UnknownPriority(other.to_owned())),
        }
    }
}

impl Default for TicketPriority {
    fn default() -> Self {
        Self::Normal
    }
}

/// A helpdesk request raised by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Primary identifier.
    pub id: Uuid,
    /// The reporting user.
    pub user_email: EmailAddress,
    /// What the ticket is about.
    pub kind: TicketKind,
    /// The affected item, when the ticket concerns one.
    pub inventory_id: Option<Uuid>,
    /// One-line summary of the problem.
    pub title: String,
    /// The reporter's description of the problem.
    pub description: String,
    /// Reporter-assigned urgency.
    pub priority: TicketPriority,
    /// Workflow status.
    pub status: TicketStatus,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A ticket joined with display fields of the referenced item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketView {
    /// The ticket itself.
    pub ticket: Ticket,
    /// Product name of the referenced item, when it still exists.
    pub product_name: Option<String>,
    /// Serial code of the referenced item, when it still exists.
    pub product_serial: Option<String>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fault", TicketKind::Fault)]
    #[case("count", TicketKind::Count)]
    #[case("change", TicketKind::Change)]
    #[case("general", TicketKind::General)]
    fn kinds_parse(#[case] raw: &str, #[case] expected: TicketKind) {
        assert_eq!(raw.parse::<TicketKind>().expect("known kind"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("open", TicketStatus::Open)]
    #[case("in_progress", TicketStatus::InProgress)]
    #[case("closed", TicketStatus::Closed)]
    fn statuses_parse(#[case] raw: &str, #[case] expected: TicketStatus) {
        assert_eq!(raw.parse::<TicketStatus>().expect("known status"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "done".parse::<TicketStatus>().expect_err("unknown status");
        assert_eq!(err, TicketValidationError::UnknownStatus("done".into()));
    }

    #[test]
    fn priority_defaults_to_normal() {
        assert_eq!(TicketPriority::default(), TicketPriority::Normal);
    }
}
