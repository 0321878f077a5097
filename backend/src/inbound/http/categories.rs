//! Category registry HTTP handlers.
//!
//! ```text
//! GET    /api/admin/categories
//! POST   /api/admin/categories
//! DELETE /api/admin/categories/{category_id}
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Category, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field, parse_uuid};
use crate::inbound::http::ApiResult;

#[derive(Debug, Deserialize)]
struct CategoryPath {
    category_id: String,
}

/// Request payload for registering a category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    /// Unique display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Response payload for a category.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Category identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name,
            description: category.description,
            created_at: category.created_at.to_rfc3339(),
        }
    }
}

/// Every category, ordered by name.
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "Categories", body = [CategoryResponse]),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CategoryResponse>>> {
    session.require_admin()?;
    let categories = state.categories.list_categories().await?;
    Ok(web::Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// Register a new category.
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category registered", body = CategoryResponse),
        (status = 400, description = "Invalid request or name already taken", body = Error),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["categories"],
    operation_id = "addCategory"
)]
#[post("/categories")]
pub async fn add_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let payload = payload.into_inner();
    let name = payload.name.ok_or_else(|| missing_field("name"))?;
    let category = state
        .categories
        .add_category(name, payload.description)
        .await?;
    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

/// Remove a category with no remaining items.
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category identifier")),
    responses(
        (status = 204, description = "Category removed"),
        (status = 400, description = "Category still in use", body = Error),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Unknown category", body = Error)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/categories/{category_id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CategoryPath>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let category_id = parse_uuid(&path.into_inner().category_id, "categoryId")?;
    state.categories.delete_category(category_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Handler-level coverage with mocked ports.
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::Utc;
    use uuid::Uuid;

    use crate::domain::ports::MockCategoryOps;
    use crate::domain::{AuthenticatedUser, EmailAddress, Role};
    use crate::inbound::http::test_utils::test_session_middleware;

    fn app_with(
        categories: MockCategoryOps,
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
            categories: Arc::new(categories),
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
                        email: EmailAddress::new("admin@tracker.local").expect("fixture email"),
                        role,
                    })?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .service(
                web::scope("/api/admin")
                    .service(list_categories)
                    .service(add_category)
                    .service(delete_category),
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
    async fn registering_a_category_returns_the_row() {
        let mut categories = MockCategoryOps::new();
        categories
            .expect_add_category()
            .withf(|name, _| name == "Laptops")
            .times(1)
            .returning(|name, description| {
                Ok(Category {
                    id: Uuid::new_v4(),
                    name,
                    description,
                    created_at: Utc::now(),
                })
            });
        let app = test::init_service(app_with(categories, Role::Admin)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/categories")
                .cookie(cookie)
                .set_json(serde_json::json!({ "name": "Laptops" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["name"], "Laptops");
    }

    #[actix_web::test]
    async fn the_name_field_is_required() {
        let app = test::init_service(app_with(MockCategoryOps::new(), Role::Admin)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/categories")
                .cookie(cookie)
                .set_json(serde_json::json!({}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn non_admins_are_turned_away() {
        let app = test::init_service(app_with(MockCategoryOps::new(), Role::User)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/categories")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn deleting_a_category_in_use_is_a_bad_request() {
        let mut categories = MockCategoryOps::new();
        categories.expect_delete_category().returning(|_| {
            Err(Error::invalid_request(
                "category is still used by 3 inventory item(s); move them first",
            ))
        });
        let app = test::init_service(app_with(categories, Role::Admin)).await;
        let cookie = login(&app).await;
        let id = Uuid::new_v4();
        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/admin/categories/{id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
