//! Ports connecting the domain to its adapters.
//!
//! Driving ports (`*Ops`, [`LoginFlow`], [`UserAdmin`]) are the contracts
//! inbound adapters call; driven ports (`*Repository`, [`CodeMailer`]) are
//! the contracts outbound adapters implement. Every port ships a `Fixture*`
//! implementation for tests that need a collaborator but not its behaviour,
//! and a mockall mock under `cfg(test)`.

mod assignment_log_repository;
mod category_ops;
mod category_repository;
mod code_mailer;
mod count_period_repository;
mod count_submission_repository;
mod counting_ops;
mod inventory_ops;
mod inventory_repository;
mod ticket_ops;
mod ticket_repository;
mod user_ops;
mod user_repository;
mod verification_code_repository;

pub use assignment_log_repository::*;
pub use category_ops::*;
pub use category_repository::*;
pub use code_mailer::*;
pub use count_period_repository::*;
pub use count_submission_repository::*;
pub use counting_ops::*;
pub use inventory_ops::*;
pub use inventory_repository::*;
pub use ticket_ops::*;
pub use ticket_repository::*;
pub use user_ops::*;
pub use user_repository::*;
pub use verification_code_repository::*;
