//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: database failures are classified once
//!   (`diesel_helpers.rs`) and folded into each port's error enum, so
//!   unique violations surface as the port's duplicate variant.

pub(crate) mod diesel_helpers;
mod diesel_assignment_log_repository;
mod diesel_category_repository;
mod diesel_count_period_repository;
mod diesel_count_submission_repository;
mod diesel_inventory_repository;
mod diesel_ticket_repository;
mod diesel_user_repository;
mod diesel_verification_code_repository;
mod models;
mod pool;
mod schema;

pub use diesel_assignment_log_repository::DieselAssignmentLogRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_count_period_repository::DieselCountPeriodRepository;
pub use diesel_count_submission_repository::DieselCountSubmissionRepository;
pub use diesel_inventory_repository::DieselInventoryRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_verification_code_repository::DieselVerificationCodeRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
