//! Internal IT-asset and helpdesk tracker backend.
//!
//! Users authenticate with emailed one-time codes, report equipment faults,
//! and take part in periodic inventory counts. Administrators manage users,
//! inventory, categories, tickets, and count periods. The crate follows a
//! hexagonal layout: `domain` holds entities and services, `domain::ports`
//! the async contracts, `inbound::http` the actix-web adapter, and
//! `outbound` the Diesel and mail-relay adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
