//! Driven adapters: PostgreSQL persistence and mail delivery.

pub mod email;
pub mod persistence;
