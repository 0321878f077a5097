//! Driving port for inventory management.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::inventory::{InventoryItem, InventoryItemView, ItemSpec, ItemSummary};
use crate::domain::user::EmailAddress;

/// Request to register a new item.
#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    /// Descriptive fields of the item.
    pub spec: ItemSpec,
    /// Administrator registering the item.
    pub added_by: EmailAddress,
}

/// Request to rewrite an existing item.
#[derive(Debug, Clone)]
pub struct UpdateItemRequest {
    /// The item to modify.
    pub item_id: Uuid,
    /// Replacement descriptive fields.
    pub spec: ItemSpec,
}

/// Driving port for inventory management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryOps: Send + Sync {
    /// Register a new item, recording an initial assignment when one is
    /// given.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error for blank required fields, an
    /// inactive assignee, or duplicate serial or product codes.
    async fn add_item(&self, request: CreateItemRequest) -> Result<InventoryItem, Error>;

    /// Rewrite an existing item, maintaining assignment dates and the
    /// history log when the holder changes.
    async fn update_item(&self, request: UpdateItemRequest) -> Result<InventoryItem, Error>;

    /// Remove an item. History records are left in place.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no item carries the identifier.
    async fn delete_item(&self, item_id: Uuid) -> Result<(), Error>;

    /// Every item with category names, newest first.
    async fn list_items(&self) -> Result<Vec<InventoryItemView>, Error>;

    /// The caller's assigned items with category names, newest first.
    async fn items_assigned_to(&self, user: &EmailAddress)
        -> Result<Vec<InventoryItemView>, Error>;

    /// Summaries of the caller's in-service items, used to build count
    /// worksheets.
    async fn worksheet_items_for(&self, user: &EmailAddress) -> Result<Vec<ItemSummary>, Error>;
}

/// Fixture implementation returning empty results.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInventoryOps;

#[async_trait]
impl InventoryOps for FixtureInventoryOps {
    async fn add_item(&self, _request: CreateItemRequest) -> Result<InventoryItem, Error> {
        Err(Error::internal("inventory fixture has no storage"))
    }

    async fn update_item(&self, _request: UpdateItemRequest) -> Result<InventoryItem, Error> {
        Err(Error::not_found("inventory item not found"))
    }

    async fn delete_item(&self, _item_id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("inventory item not found"))
    }

    async fn list_items(&self) -> Result<Vec<InventoryItemView>, Error> {
        Ok(Vec::new())
    }

    async fn items_assigned_to(
        &self,
        _user: &EmailAddress,
    ) -> Result<Vec<InventoryItemView>, Error> {
        Ok(Vec::new())
    }

    async fn worksheet_items_for(&self, _user: &EmailAddress) -> Result<Vec<ItemSummary>, Error> {
        Ok(Vec::new())
    }
}
