//! Helpdesk ticket HTTP handlers.
//!
//! ```text
//! POST /api/tickets
//! GET  /api/my-tickets
//! GET  /api/admin/tickets
//! PUT  /api/admin/tickets/{ticket_id}/status
//! ```

use std::str::FromStr;

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CreateTicketRequest;
use crate::domain::tickets::{Ticket, TicketKind, TicketPriority, TicketStatus, TicketView};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field, parse_uuid};
use crate::inbound::http::ApiResult;

#[derive(Debug, Deserialize)]
struct TicketPath {
    ticket_id: String,
}

/// Request payload for raising a ticket.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    /// What the ticket is about: `fault`, `count`, `change`, or `general`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// The affected item, when the ticket concerns one.
    pub inventory_id: Option<String>,
    /// One-line summary of the problem.
    pub title: Option<String>,
    /// Description of the problem.
    pub description: Option<String>,
    /// Urgency: `low`, `normal`, `high`, or `urgent`; defaults to `normal`.
    pub priority: Option<String>,
}

/// Request payload for moving a ticket through its workflow.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatusRequest {
    /// New status: `open`, `in_progress`, or `closed`.
    pub status: Option<String>,
}

/// Response payload for a ticket.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    /// Ticket identifier.
    pub id: String,
    /// Reporting user.
    pub user_email: String,
    /// Ticket kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Affected item identifier, when present.
    pub inventory_id: Option<String>,
    /// One-line summary.
    pub title: String,
    /// Problem description.
    pub description: String,
    /// Urgency.
    pub priority: String,
    /// Workflow status.
    pub status: String,
    /// Product name of the affected item, when it still exists.
    pub product_name: Option<String>,
    /// Serial code of the affected item, when it still exists.
    pub product_serial: Option<String>,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last update timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<TicketView> for TicketResponse {
    fn from(view: TicketView) -> Self {
        let TicketView {
            ticket,
            product_name,
            product_serial,
        } = view;
        Self {
            product_name,
            product_serial,
            ..Self::from(ticket)
        }
    }
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            user_email: ticket.user_email.to_string(),
            kind: ticket.kind.as_str().to_owned(),
            inventory_id: ticket.inventory_id.map(|id| id.to_string()),
            title: ticket.title,
            description: ticket.description,
            priority: ticket.priority.as_str().to_owned(),
            status: ticket.status.as_str().to_owned(),
            product_name: None,
            product_serial: None,
            created_at: ticket.created_at.to_rfc3339(),
            updated_at: ticket.updated_at.to_rfc3339(),
        }
    }
}

/// Raise a new ticket.
#[utoipa::path(
    post,
    path = "/api/tickets",
    request_body = TicketRequest,
    responses(
        (status = 201, description = "Ticket raised", body = TicketResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TicketRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user()?;
    let payload = payload.into_inner();
    let kind_raw = payload.kind.ok_or_else(|| missing_field("type"))?;
    let kind =
        TicketKind::from_str(&kind_raw).map_err(|err| Error::invalid_request(err.to_string()))?;
    let title = payload.title.ok_or_else(|| missing_field("title"))?;
    let description = payload
        .description
        .ok_or_else(|| missing_field("description"))?;
    let priority = match payload.priority.as_deref() {
        Some(raw) => TicketPriority::from_str(raw)
            .map_err(|err| Error::invalid_request(err.to_string()))?,
        None => TicketPriority::default(),
    };
    let inventory_id = payload
        .inventory_id
        .as_deref()
        .map(|raw| parse_uuid(raw, "inventoryId"))
        .transpose()?;
    let ticket = state
        .tickets
        .create_ticket(CreateTicketRequest {
            user_email: user.email,
            kind,
            inventory_id,
            title,
            description,
            priority,
        })
        .await?;
    Ok(HttpResponse::Created().json(TicketResponse::from(ticket)))
}

/// The caller's tickets, newest first.
#[utoipa::path(
    get,
    path = "/api/my-tickets",
    responses(
        (status = 200, description = "Tickets", body = [TicketResponse]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "listMyTickets"
)]
#[get("/my-tickets")]
pub async fn my_tickets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TicketResponse>>> {
    let user = session.require_user()?;
    let tickets = state.tickets.tickets_for(&user.email).await?;
    Ok(web::Json(tickets.into_iter().map(TicketResponse::from).collect()))
}

/// Every ticket, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/tickets",
    responses(
        (status = 200, description = "Tickets", body = [TicketResponse]),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "listAllTickets"
)]
#[get("/tickets")]
pub async fn all_tickets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TicketResponse>>> {
    session.require_admin()?;
    let tickets = state.tickets.all_tickets().await?;
    Ok(web::Json(tickets.into_iter().map(TicketResponse::from).collect()))
}

/// Move a ticket to a new workflow status.
#[utoipa::path(
    put,
    path = "/api/admin/tickets/{ticket_id}/status",
    request_body = TicketStatusRequest,
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 204, description = "Status changed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Unknown ticket", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "updateTicketStatus"
)]
#[put("/tickets/{ticket_id}/status")]
pub async fn update_ticket_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TicketPath>,
    payload: web::Json<TicketStatusRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let ticket_id = parse_uuid(&path.into_inner().ticket_id, "ticketId")?;
    let raw = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field("status"))?;
    let status =
        TicketStatus::from_str(&raw).map_err(|err| Error::invalid_request(err.to_string()))?;
    state.tickets.update_status(ticket_id, status).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Handler-level coverage with mocked ports.
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use uuid::Uuid;

    use crate::domain::ports::MockTicketOps;
    use crate::domain::{AuthenticatedUser, EmailAddress, Role};
    use crate::inbound::http::test_utils::test_session_middleware;

    fn app_with(
        tickets: MockTicketOps,
        role: Role,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState {
            tickets: Arc::new(tickets),
            ..HttpState::default()
        };
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .route(
                "/login",
                web::post().to(move |session: SessionContext| async move {
                    session.persist_user(&AuthenticatedUser {
                        id: Uuid::new_v4(),
                        email: EmailAddress::new("worker@tracker.local").expect("fixture email"),
                        role,
                    })?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .service(
                web::scope("/api")
                    .service(create_ticket)
                    .service(my_tickets)
                    .service(
                        web::scope("/admin")
                            .service(all_tickets)
                            .service(update_ticket_status),
                    ),
            )
    }

    async fn login(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::cookie::Cookie<'static> {
        let res =
            test::call_service(app, test::TestRequest::post().uri("/login").to_request()).await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn raising_a_ticket_attaches_the_session_identity() {
        let mut tickets = MockTicketOps::new();
        tickets
            .expect_create_ticket()
            .withf(|request| {
                request.user_email.as_str() == "worker@tracker.local"
                    && request.kind == TicketKind::Fault
            })
            .times(1)
            .returning(|request| {
                let now = chrono::Utc::now();
                Ok(Ticket {
                    id: Uuid::new_v4(),
                    user_email: request.user_email,
                    kind: request.kind,
                    inventory_id: request.inventory_id,
                    title: request.title,
                    description: request.description,
                    priority: request.priority,
                    status: TicketStatus::Open,
                    created_at: now,
                    updated_at: now,
                })
            });
        let app = test::init_service(app_with(tickets, Role::User)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/tickets")
                .cookie(cookie)
                .set_json(serde_json::json!({
                    "type": "fault",
                    "title": "Broken screen",
                    "description": "screen flickers",
                    "priority": "high",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "open");
        assert_eq!(body["type"], "fault");
        assert_eq!(body["title"], "Broken screen");
    }

    #[actix_web::test]
    async fn a_ticket_without_a_title_is_rejected() {
        let app = test::init_service(app_with(MockTicketOps::new(), Role::User)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/tickets")
                .cookie(cookie)
                .set_json(serde_json::json!({
                    "type": "fault",
                    "description": "screen flickers",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unknown_kinds_are_rejected() {
        let app = test::init_service(app_with(MockTicketOps::new(), Role::User)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/tickets")
                .cookie(cookie)
                .set_json(serde_json::json!({
                    "type": "complaint",
                    "title": "Complaint",
                    "description": "x",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn the_admin_listing_is_fenced() {
        let app = test::init_service(app_with(MockTicketOps::new(), Role::User)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/tickets")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn status_updates_parse_the_workflow_state() {
        let mut tickets = MockTicketOps::new();
        tickets
            .expect_update_status()
            .withf(|_, status| *status == TicketStatus::InProgress)
            .times(1)
            .returning(|_, _| Ok(()));
        let app = test::init_service(app_with(tickets, Role::Admin)).await;
        let cookie = login(&app).await;
        let id = Uuid::new_v4();
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/admin/tickets/{id}/status"))
                .cookie(cookie)
                .set_json(serde_json::json!({ "status": "in_progress" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
