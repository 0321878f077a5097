//! Inventory HTTP handlers.
//!
//! ```text
//! GET    /api/my-inventory
//! GET    /api/my-assigned-products
//! POST   /api/admin/inventory
//! GET    /api/admin/inventory
//! PUT    /api/admin/inventory/{item_id}
//! DELETE /api/admin/inventory/{item_id}
//! ```

use std::str::FromStr;

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::inventory::{
    InventoryItem, InventoryItemView, ItemSpec, ItemStatus, ItemSummary,
};
use crate::domain::ports::{CreateItemRequest, UpdateItemRequest};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field, parse_date, parse_email, parse_uuid};
use crate::inbound::http::ApiResult;

#[derive(Debug, Deserialize)]
struct ItemPath {
    item_id: String,
}

/// Request payload for registering or rewriting an item.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    /// Display name (required).
    pub product_name: Option<String>,
    /// Manufacturer.
    pub brand: Option<String>,
    /// Model designation.
    pub model: Option<String>,
    /// Unique manufacturer serial code (required).
    pub serial_code: Option<String>,
    /// Unique internal product code (required).
    pub product_code: Option<String>,
    /// Email address of the user the item is assigned to.
    pub assigned_user_email: Option<String>,
    /// Category identifier.
    pub category_id: Option<String>,
    /// Physical location note.
    pub location: Option<String>,
    /// Free-form remarks.
    pub notes: Option<String>,
    /// Purchase date, `YYYY-MM-DD`.
    pub purchase_date: Option<String>,
    /// Warranty expiry, `YYYY-MM-DD`.
    pub warranty_end_date: Option<String>,
    /// Operational status; defaults to `active`.
    pub status: Option<String>,
}

impl ItemPayload {
    fn into_spec(self) -> Result<ItemSpec, Error> {
        let product_name = self.product_name.ok_or_else(|| missing_field("productName"))?;
        let serial_code = self.serial_code.ok_or_else(|| missing_field("serialCode"))?;
        let product_code = self.product_code.ok_or_else(|| missing_field("productCode"))?;
        let assigned_user_email = self
            .assigned_user_email
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_email(raw, "assignedUserEmail"))
            .transpose()?;
        let category_id = self
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_uuid(raw, "categoryId"))
            .transpose()?;
        let purchase_date = self
            .purchase_date
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_date(raw, "purchaseDate"))
            .transpose()?;
        let warranty_end_date = self
            .warranty_end_date
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_date(raw, "warrantyEndDate"))
            .transpose()?;
        let status = self
            .status
            .as_deref()
            .map(|raw| {
                ItemStatus::from_str(raw).map_err(|err| Error::invalid_request(err.to_string()))
            })
            .transpose()?;
        Ok(ItemSpec {
            product_name,
            brand: self.brand,
            model: self.model,
            serial_code,
            product_code,
            assigned_user_email,
            category_id,
            location: self.location,
            notes: self.notes,
            purchase_date,
            warranty_end_date,
            status,
        })
    }
}

/// Response payload for an inventory item.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    /// Item identifier.
    pub id: String,
    /// Display name.
    pub product_name: String,
    /// Manufacturer, when known.
    pub brand: Option<String>,
    /// Model designation, when known.
    pub model: Option<String>,
    /// Manufacturer serial code.
    pub serial_code: String,
    /// Internal product code.
    pub product_code: String,
    /// Current holder, when assigned.
    pub assigned_user_email: Option<String>,
    /// Category identifier, when categorised.
    pub category_id: Option<String>,
    /// Name of the referenced category, when it still exists.
    pub category_name: Option<String>,
    /// Physical location note.
    pub location: Option<String>,
    /// Free-form remarks.
    pub notes: Option<String>,
    /// Purchase date, `YYYY-MM-DD`.
    pub purchase_date: Option<String>,
    /// Warranty expiry, `YYYY-MM-DD`.
    pub warranty_end_date: Option<String>,
    /// When the current assignment began, RFC 3339.
    pub assignment_date: Option<String>,
    /// When the item was last unassigned, RFC 3339.
    pub unassignment_date: Option<String>,
    /// Operational status.
    pub status: String,
    /// Administrator who registered the item.
    pub added_by_email: String,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last update timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<InventoryItem> for ItemResponse {
    fn from(item: InventoryItem) -> Self {
        Self {
            id: item.id.to_string(),
            product_name: item.product_name,
            brand: item.brand,
            model: item.model,
            serial_code: item.serial_code,
            product_code: item.product_code,
            assigned_user_email: item.assigned_user_email.map(|email| email.to_string()),
            category_id: item.category_id.map(|id| id.to_string()),
            category_name: None,
            location: item.location,
            notes: item.notes,
            purchase_date: item.purchase_date.map(|date| date.to_string()),
            warranty_end_date: item.warranty_end_date.map(|date| date.to_string()),
            assignment_date: item.assignment_date.map(|stamp| stamp.to_rfc3339()),
            unassignment_date: item.unassignment_date.map(|stamp| stamp.to_rfc3339()),
            status: item.status.as_str().to_owned(),
            added_by_email: item.added_by_email.to_string(),
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}

impl From<InventoryItemView> for ItemResponse {
    fn from(view: InventoryItemView) -> Self {
        let InventoryItemView {
            item,
            category_name,
        } = view;
        Self {
            category_name,
            ..Self::from(item)
        }
    }
}

/// Compact item fields shown on count worksheets.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummaryResponse {
    /// Item identifier.
    pub id: String,
    /// Display name.
    pub product_name: String,
    /// Manufacturer, when known.
    pub brand: Option<String>,
    /// Model designation, when known.
    pub model: Option<String>,
    /// Internal product code.
    pub product_code: String,
    /// Manufacturer serial code.
    pub serial_code: String,
}

impl From<ItemSummary> for ItemSummaryResponse {
    fn from(summary: ItemSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            product_name: summary.product_name,
            brand: summary.brand,
            model: summary.model,
            product_code: summary.product_code,
            serial_code: summary.serial_code,
        }
    }
}

/// Register a new item.
#[utoipa::path(
    post,
    path = "/api/admin/inventory",
    request_body = ItemPayload,
    responses(
        (status = 201, description = "Item registered", body = ItemResponse),
        (status = 400, description = "Invalid request or duplicate serial or product code", body = Error),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "addInventoryItem"
)]
#[post("/inventory")]
pub async fn add_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ItemPayload>,
) -> ApiResult<HttpResponse> {
    let admin = session.require_admin()?;
    let spec = payload.into_inner().into_spec()?;
    let item = state
        .inventory
        .add_item(CreateItemRequest {
            spec,
            added_by: admin.email,
        })
        .await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(item)))
}

/// Every item, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/inventory",
    responses(
        (status = 200, description = "Items", body = [ItemResponse]),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "listInventory"
)]
#[get("/inventory")]
pub async fn list_items(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ItemResponse>>> {
    session.require_admin()?;
    let items = state.inventory.list_items().await?;
    Ok(web::Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// Rewrite an existing item.
#[utoipa::path(
    put,
    path = "/api/admin/inventory/{item_id}",
    request_body = ItemPayload,
    params(("item_id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Invalid request or duplicate serial or product code", body = Error),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Unknown item", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "updateInventoryItem"
)]
#[put("/inventory/{item_id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ItemPath>,
    payload: web::Json<ItemPayload>,
) -> ApiResult<web::Json<ItemResponse>> {
    session.require_admin()?;
    let item_id = parse_uuid(&path.into_inner().item_id, "itemId")?;
    let spec = payload.into_inner().into_spec()?;
    let item = state
        .inventory
        .update_item(UpdateItemRequest { item_id, spec })
        .await?;
    Ok(web::Json(ItemResponse::from(item)))
}

/// Remove an item. Assignment history is kept.
#[utoipa::path(
    delete,
    path = "/api/admin/inventory/{item_id}",
    params(("item_id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Unknown item", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "deleteInventoryItem"
)]
#[delete("/inventory/{item_id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ItemPath>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let item_id = parse_uuid(&path.into_inner().item_id, "itemId")?;
    state.inventory.delete_item(item_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// The caller's assigned items, newest first.
#[utoipa::path(
    get,
    path = "/api/my-inventory",
    responses(
        (status = 200, description = "Assigned items", body = [ItemResponse]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "listMyInventory"
)]
#[get("/my-inventory")]
pub async fn my_inventory(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ItemResponse>>> {
    let user = session.require_user()?;
    let items = state.inventory.items_assigned_to(&user.email).await?;
    Ok(web::Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// The caller's in-service items, used to build count worksheets.
#[utoipa::path(
    get,
    path = "/api/my-assigned-products",
    responses(
        (status = 200, description = "Worksheet items", body = [ItemSummaryResponse]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "listMyAssignedProducts"
)]
#[get("/my-assigned-products")]
pub async fn my_assigned_products(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ItemSummaryResponse>>> {
    let user = session.require_user()?;
    let items = state.inventory.worksheet_items_for(&user.email).await?;
    Ok(web::Json(
        items.into_iter().map(ItemSummaryResponse::from).collect(),
    ))
}
