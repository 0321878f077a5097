//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they depend
//! only on driving ports and stay testable without a database or mail relay.

use std::sync::Arc;

use crate::domain::ports::{
    CategoryOps, CountPeriodOps, CountSubmissionOps, FixtureCategoryOps, FixtureCountPeriodOps,
    FixtureCountSubmissionOps, FixtureInventoryOps, FixtureLoginFlow, FixtureTicketOps,
    FixtureUserAdmin, InventoryOps, LoginFlow, TicketOps, UserAdmin,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Passwordless login flow.
    pub login: Arc<dyn LoginFlow>,
    /// Account registry.
    pub users: Arc<dyn UserAdmin>,
    /// Helpdesk tickets.
    pub tickets: Arc<dyn TicketOps>,
    /// Inventory management.
    pub inventory: Arc<dyn InventoryOps>,
    /// Category registry.
    pub categories: Arc<dyn CategoryOps>,
    /// Count-period registry.
    pub count_periods: Arc<dyn CountPeriodOps>,
    /// Count-submission engine.
    pub count_submissions: Arc<dyn CountSubmissionOps>,
}

impl Default for HttpState {
    fn default() -> Self {
        Self {
            login: Arc::new(FixtureLoginFlow),
            users: Arc::new(FixtureUserAdmin),
            tickets: Arc::new(FixtureTicketOps),
            inventory: Arc::new(FixtureInventoryOps),
            categories: Arc::new(FixtureCategoryOps),
            count_periods: Arc::new(FixtureCountPeriodOps),
            count_submissions: Arc::new(FixtureCountSubmissionOps),
        }
    }
}
