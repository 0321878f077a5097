//! HTTP inbound adapter exposing the REST API.

pub mod auth;
pub mod categories;
pub mod counting;
pub mod error;
pub mod health;
pub mod inventory;
pub mod session;
pub mod state;
pub mod tickets;
pub mod users;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
