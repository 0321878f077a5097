//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], which generates the OpenAPI specification for the
//! REST API: every handler path from the inbound layer, the request and
//! response schemas, and the session-cookie security scheme. The generated
//! document feeds Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::counting::{ActualCount, CountEntry, ItemDisplay, PeriodStatus, SubmissionStatus};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{IdentityResponse, SendCodeRequest, VerifyCodeRequest};
use crate::inbound::http::categories::{CategoryRequest, CategoryResponse};
use crate::inbound::http::counting::{
    EnrichedSubmissionResponse, PeriodRequest, PeriodResponse, ResolvedEntryResponse,
    SaveOutcomeResponse, SaveSubmissionPayload, SubmissionResponse, UserPeriodResponse,
};
use crate::inbound::http::inventory::{ItemPayload, ItemResponse, ItemSummaryResponse};
use crate::inbound::http::tickets::{TicketRequest, TicketResponse, TicketStatusRequest};
use crate::inbound::http::users::{
    AddUserRequest, UpdateActiveRequest, UpdateRoleRequest, UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/verify-code.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "IT-asset tracker API",
        description = "HTTP interface for passwordless login, helpdesk tickets, \
                       inventory administration, and periodic inventory counts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::send_code,
        crate::inbound::http::auth::verify_code,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::my_tickets,
        crate::inbound::http::tickets::all_tickets,
        crate::inbound::http::tickets::update_ticket_status,
        crate::inbound::http::inventory::add_item,
        crate::inbound::http::inventory::list_items,
        crate::inbound::http::inventory::update_item,
        crate::inbound::http::inventory::delete_item,
        crate::inbound::http::inventory::my_inventory,
        crate::inbound::http::inventory::my_assigned_products,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::add_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::users::add_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::update_role,
        crate::inbound::http::users::update_status,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::counting::create_period,
        crate::inbound::http::counting::list_periods,
        crate::inbound::http::counting::active_period_for_admin,
        crate::inbound::http::counting::update_period,
        crate::inbound::http::counting::delete_period,
        crate::inbound::http::counting::current_period,
        crate::inbound::http::counting::save_submission,
        crate::inbound::http::counting::delete_draft,
        crate::inbound::http::counting::submissions_for_period,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SendCodeRequest,
        VerifyCodeRequest,
        IdentityResponse,
        TicketRequest,
        TicketStatusRequest,
        TicketResponse,
        ItemPayload,
        ItemResponse,
        ItemSummaryResponse,
        CategoryRequest,
        CategoryResponse,
        AddUserRequest,
        UpdateRoleRequest,
        UpdateActiveRequest,
        UserResponse,
        PeriodRequest,
        PeriodResponse,
        PeriodStatus,
        SubmissionStatus,
        SubmissionResponse,
        UserPeriodResponse,
        SaveSubmissionPayload,
        SaveOutcomeResponse,
        ResolvedEntryResponse,
        EnrichedSubmissionResponse,
        ActualCount,
        CountEntry,
        ItemDisplay,
    )),
    tags(
        (name = "auth", description = "Passwordless login and session management"),
        (name = "tickets", description = "Helpdesk tickets"),
        (name = "inventory", description = "Equipment registry and assignments"),
        (name = "categories", description = "Equipment categories"),
        (name = "users", description = "Account administration"),
        (name = "counting", description = "Count periods and submissions"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Structural checks over the generated document.
    use super::*;

    #[test]
    fn every_surface_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for expected in [
            "/api/send-code",
            "/api/verify-code",
            "/api/me",
            "/api/tickets",
            "/api/my-tickets",
            "/api/my-inventory",
            "/api/my-assigned-products",
            "/api/count-period",
            "/api/count-submission",
            "/api/admin/tickets",
            "/api/admin/inventory",
            "/api/admin/categories",
            "/api/admin/users",
            "/api/admin/count-period",
            "/api/admin/count-periods",
            "/health/live",
            "/health/ready",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }

    #[test]
    fn error_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.keys().any(|name| name.contains("Error")));
    }
}
