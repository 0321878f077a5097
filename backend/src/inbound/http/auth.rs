//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/send-code
//! POST /api/verify-code
//! POST /api/logout
//! GET  /api/me
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthenticatedUser, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field, parse_email};
use crate::inbound::http::ApiResult;

/// Request payload for requesting a login code.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeRequest {
    /// Registered email address.
    pub email: Option<String>,
}

/// Request payload for exchanging a code for a session.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    /// Registered email address.
    pub email: Option<String>,
    /// The six digits from the mail.
    pub code: Option<String>,
}

/// The identity attached to the session.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    /// Account identifier.
    pub id: String,
    /// Login address.
    pub email: String,
    /// Access role, `user` or `admin`.
    pub role: String,
}

impl From<AuthenticatedUser> for IdentityResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role.as_str().to_owned(),
        }
    }
}

/// Request a one-time login code by mail.
#[utoipa::path(
    post,
    path = "/api/send-code",
    request_body = SendCodeRequest,
    responses(
        (status = 204, description = "Code issued and mailed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Address not registered", body = Error),
        (status = 503, description = "Mail relay unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "sendLoginCode"
)]
#[post("/send-code")]
pub async fn send_code(
    state: web::Data<HttpState>,
    payload: web::Json<SendCodeRequest>,
) -> ApiResult<HttpResponse> {
    let raw = payload
        .into_inner()
        .email
        .ok_or_else(|| missing_field("email"))?;
    let email = parse_email(&raw, "email")?;
    state.login.send_code(&email).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Exchange a login code for a session cookie.
#[utoipa::path(
    post,
    path = "/api/verify-code",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Session established", body = IdentityResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Wrong, expired, or used code", body = Error),
        (status = 403, description = "Account deactivated", body = Error)
    ),
    tags = ["auth"],
    operation_id = "verifyLoginCode"
)]
#[post("/verify-code")]
pub async fn verify_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VerifyCodeRequest>,
) -> ApiResult<web::Json<IdentityResponse>> {
    let payload = payload.into_inner();
    let raw_email = payload.email.ok_or_else(|| missing_field("email"))?;
    let code = payload.code.ok_or_else(|| missing_field("code"))?;
    let email = parse_email(&raw_email, "email")?;
    let user = state.login.verify_code(&email, &code).await?;
    session.persist_user(&user)?;
    Ok(web::Json(IdentityResponse::from(user)))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The identity of the calling session.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current identity", body = IdentityResponse),
        (status = 401, description = "Not logged in", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentIdentity"
)]
#[get("/me")]
pub async fn me(session: SessionContext) -> ApiResult<web::Json<IdentityResponse>> {
    let user = session.require_user()?;
    Ok(web::Json(IdentityResponse::from(user)))
}
