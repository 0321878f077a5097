//! User administration HTTP handlers.
//!
//! ```text
//! POST   /api/admin/users
//! GET    /api/admin/users
//! PUT    /api/admin/users/{user_id}/role
//! PUT    /api/admin/users/{user_id}/status
//! DELETE /api/admin/users/{user_id}
//! ```

use std::str::FromStr;

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AccountChangeRequest;
use crate::domain::{Error, Role, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field, parse_email, parse_uuid};
use crate::inbound::http::ApiResult;

#[derive(Debug, Deserialize)]
struct UserPath {
    user_id: String,
}

/// Request payload for registering a user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    /// Login address.
    pub email: Option<String>,
    /// Access role, `user` or `admin`; defaults to `user`.
    pub role: Option<String>,
}

/// Request payload for changing a role.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    /// New role, `user` or `admin`.
    pub role: Option<String>,
}

/// Request payload for enabling or disabling an account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActiveRequest {
    /// New active state.
    pub is_active: Option<bool>,
}

/// Response payload for an account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Account identifier.
    pub id: String,
    /// Login address.
    pub email: String,
    /// Access role.
    pub role: String,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Registration timestamp, RFC 3339.
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role.as_str().to_owned(),
            is_active: user.is_active,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

fn parse_role(raw: &str) -> Result<Role, Error> {
    Role::from_str(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = AddUserRequest,
    responses(
        (status = 201, description = "Account registered", body = UserResponse),
        (status = 400, description = "Invalid request or email already registered", body = Error),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["users"],
    operation_id = "addUser"
)]
#[post("/users")]
pub async fn add_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddUserRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let payload = payload.into_inner();
    let raw_email = payload.email.ok_or_else(|| missing_field("email"))?;
    let email = parse_email(&raw_email, "email")?;
    let role = match payload.role.as_deref() {
        Some(raw) => parse_role(raw)?,
        None => Role::User,
    };
    let user = state.users.add_user(email, role).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Every account, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "Accounts", body = [UserResponse]),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    session.require_admin()?;
    let users = state.users.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Change an account's role.
#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/role",
    request_body = UpdateRoleRequest,
    params(("user_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Role changed"),
        (status = 403, description = "Own account or no admin session", body = Error),
        (status = 404, description = "Unknown account", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserRole"
)]
#[put("/users/{user_id}/role")]
pub async fn update_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserPath>,
    payload: web::Json<UpdateRoleRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_admin()?;
    let target_id = parse_uuid(&path.into_inner().user_id, "userId")?;
    let raw = payload
        .into_inner()
        .role
        .ok_or_else(|| missing_field("role"))?;
    let role = parse_role(&raw)?;
    state
        .users
        .update_role(
            AccountChangeRequest {
                target_id,
                actor_id: actor.id,
            },
            role,
        )
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Enable or disable an account.
#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/status",
    request_body = UpdateActiveRequest,
    params(("user_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Active state changed"),
        (status = 403, description = "Own account or no admin session", body = Error),
        (status = 404, description = "Unknown account", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserStatus"
)]
#[put("/users/{user_id}/status")]
pub async fn update_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserPath>,
    payload: web::Json<UpdateActiveRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_admin()?;
    let target_id = parse_uuid(&path.into_inner().user_id, "userId")?;
    let is_active = payload
        .into_inner()
        .is_active
        .ok_or_else(|| missing_field("isActive"))?;
    state
        .users
        .update_active(
            AccountChangeRequest {
                target_id,
                actor_id: actor.id,
            },
            is_active,
        )
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete an account and release its equipment.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}",
    params(("user_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 403, description = "Own account or no admin session", body = Error),
        (status = 404, description = "Unknown account", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserPath>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_admin()?;
    let target_id = parse_uuid(&path.into_inner().user_id, "userId")?;
    state
        .users
        .delete_user(AccountChangeRequest {
            target_id,
            actor_id: actor.id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
