//! Domain layer: entities, services, and the ports they speak through.
//!
//! Nothing in this module touches HTTP, SQL, or SMTP. Inbound adapters call
//! the driving ports in [`ports`]; outbound adapters implement the driven
//! ports defined there.

pub mod auth;
pub mod catalog;
mod category_service;
pub mod counting;
mod error;
pub mod inventory;
pub mod ports;
mod ticket_service;
pub mod tickets;
pub mod user;
mod user_directory;

pub use auth::{LoginCode, LoginCodeService, VerificationCode};
pub use catalog::Category;
pub use category_service::CategoryService;
pub use counting::{CountPeriodService, CountSubmissionService};
pub use error::{Error, ErrorCode};
pub use inventory::InventoryService;
pub use ticket_service::TicketService;
pub use user::{AuthenticatedUser, EmailAddress, Role, User};
pub use user_directory::UserDirectoryService;
