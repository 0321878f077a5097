//! Inventory management service.
//!
//! Implements [`InventoryOps`] over the inventory store, the assignment
//! history log, and the user registry (to vet assignees). History writes are
//! best effort: a log failure is reported but never rolls back the item
//! mutation, so the log can lag the `assigned_user_email` column under
//! failure.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::inventory::{
    AssignmentEvent, InventoryItem, InventoryItemView, ItemStatus, ItemSummary,
};
use crate::domain::ports::{
    AssignmentLogRepository, CreateItemRequest, InventoryOps, InventoryRepository,
    InventoryRepositoryError, ItemChanges, UpdateItemRequest, UserRepository, UserRepositoryError,
};
use crate::domain::user::EmailAddress;

/// Inventory service implementing the driving port.
#[derive(Clone)]
pub struct InventoryService<I, L, U> {
    inventory: Arc<I>,
    history: Arc<L>,
    users: Arc<U>,
}

impl<I, L, U> InventoryService<I, L, U> {
    /// Create a new service over the given collaborators.
    pub fn new(inventory: Arc<I>, history: Arc<L>, users: Arc<U>) -> Self {
        Self {
            inventory,
            history,
            users,
        }
    }
}

fn map_inventory_error(error: InventoryRepositoryError) -> Error {
    match error {
        InventoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("inventory repository unavailable: {message}"))
        }
        InventoryRepositoryError::Query { message } => {
            Error::internal(format!("inventory repository error: {message}"))
        }
        InventoryRepositoryError::DuplicateCode { .. } => {
            Error::invalid_request("an item with this serial or product code already exists")
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message }
        | UserRepositoryError::DuplicateEmail { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

impl<I, L, U> InventoryService<I, L, U>
where
    I: InventoryRepository,
    L: AssignmentLogRepository,
    U: UserRepository,
{
    async fn vet_assignee(&self, assignee: &EmailAddress) -> Result<(), Error> {
        let account = self
            .users
            .find_active_by_email(assignee)
            .await
            .map_err(map_user_error)?;
        if account.is_none() {
            return Err(Error::invalid_request(
                "assigned user is not an active account",
            ));
        }
        Ok(())
    }

    async fn record_assignment(
        &self,
        inventory_id: Uuid,
        assignee: &EmailAddress,
        assigned_at: DateTime<Utc>,
        notes: &str,
    ) {
        let event = AssignmentEvent {
            id: Uuid::new_v4(),
            inventory_id,
            user_email: assignee.clone(),
            assigned_at,
            unassigned_at: None,
            notes: Some(notes.to_owned()),
        };
        if let Err(error) = self.history.append(&event).await {
            tracing::warn!(
                inventory_id = %inventory_id,
                %error,
                "assignment history append failed; item state is authoritative"
            );
        }
    }

    async fn record_unassignment(
        &self,
        inventory_id: Uuid,
        holder: &EmailAddress,
        unassigned_at: DateTime<Utc>,
    ) {
        match self
            .history
            .close_open(inventory_id, holder, unassigned_at)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(
                    inventory_id = %inventory_id,
                    "no open assignment record to close"
                );
            }
            Err(error) => {
                tracing::warn!(
                    inventory_id = %inventory_id,
                    %error,
                    "assignment history close failed; item state is authoritative"
                );
            }
        }
    }

    async fn refreshed(&self, item_id: Uuid) -> Result<InventoryItem, Error> {
        self.inventory
            .find_by_id(item_id)
            .await
            .map_err(map_inventory_error)?
            .ok_or_else(|| Error::not_found("inventory item not found"))
    }
}

#[async_trait]
impl<I, L, U> InventoryOps for InventoryService<I, L, U>
where
    I: InventoryRepository,
    L: AssignmentLogRepository,
    U: UserRepository,
{
    async fn add_item(&self, request: CreateItemRequest) -> Result<InventoryItem, Error> {
        let spec = request.spec;
        spec.validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if let Some(assignee) = &spec.assigned_user_email {
            self.vet_assignee(assignee).await?;
        }
        let now = Utc::now();
        let item = InventoryItem {
            id: Uuid::new_v4(),
            product_name: spec.product_name,
            brand: spec.brand,
            model: spec.model,
            serial_code: spec.serial_code,
            product_code: spec.product_code,
            assignment_date: spec.assigned_user_email.as_ref().map(|_| now),
            assigned_user_email: spec.assigned_user_email,
            category_id: spec.category_id,
            location: spec.location,
            notes: spec.notes,
            purchase_date: spec.purchase_date,
            warranty_end_date: spec.warranty_end_date,
            unassignment_date: None,
            status: spec.status.unwrap_or(ItemStatus::Active),
            added_by_email: request.added_by,
            created_at: now,
            updated_at: now,
        };
        self.inventory
            .insert(&item)
            .await
            .map_err(map_inventory_error)?;
        if let Some(assignee) = &item.assigned_user_email {
            self.record_assignment(item.id, assignee, now, "initial assignment")
                .await;
        }
        tracing::info!(item_id = %item.id, product_code = %item.product_code, "inventory item added");
        Ok(item)
    }

    async fn update_item(&self, request: UpdateItemRequest) -> Result<InventoryItem, Error> {
        let spec = request.spec;
        spec.validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let existing = self.refreshed(request.item_id).await?;
        let previous_holder = existing.assigned_user_email.clone();
        let next_holder = spec.assigned_user_email.clone();
        let holder_changed = previous_holder != next_holder;
        if holder_changed {
            if let Some(assignee) = &next_holder {
                self.vet_assignee(assignee).await?;
            }
        }
        let now = Utc::now();
        let (assignment_date, unassignment_date) = if holder_changed {
            match &next_holder {
                Some(_) => (Some(now), None),
                None => (None, Some(now)),
            }
        } else {
            (existing.assignment_date, existing.unassignment_date)
        };
        let changes = ItemChanges {
            product_name: spec.product_name,
            brand: spec.brand,
            model: spec.model,
            serial_code: spec.serial_code,
            product_code: spec.product_code,
            assigned_user_email: next_holder.clone(),
            category_id: spec.category_id,
            location: spec.location,
            notes: spec.notes,
            purchase_date: spec.purchase_date,
            warranty_end_date: spec.warranty_end_date,
            assignment_date,
            unassignment_date,
            status: spec.status.unwrap_or(existing.status),
            updated_at: now,
        };
        let matched = self
            .inventory
            .update(request.item_id, &changes)
            .await
            .map_err(map_inventory_error)?;
        if !matched {
            return Err(Error::not_found("inventory item not found"));
        }
        if holder_changed {
            if let Some(holder) = &previous_holder {
                self.record_unassignment(request.item_id, holder, now).await;
            }
            if let Some(assignee) = &next_holder {
                self.record_assignment(request.item_id, assignee, now, "reassignment")
                    .await;
            }
        }
        self.refreshed(request.item_id).await
    }

    async fn delete_item(&self, item_id: Uuid) -> Result<(), Error> {
        let deleted = self
            .inventory
            .delete(item_id)
            .await
            .map_err(map_inventory_error)?;
        if !deleted {
            return Err(Error::not_found("inventory item not found"));
        }
        tracing::info!(item_id = %item_id, "inventory item deleted");
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<InventoryItemView>, Error> {
        self.inventory
            .list_detailed()
            .await
            .map_err(map_inventory_error)
    }

    async fn items_assigned_to(
        &self,
        user: &EmailAddress,
    ) -> Result<Vec<InventoryItemView>, Error> {
        self.inventory
            .assigned_to(user)
            .await
            .map_err(map_inventory_error)
    }

    async fn worksheet_items_for(&self, user: &EmailAddress) -> Result<Vec<ItemSummary>, Error> {
        self.inventory
            .active_assigned_to(user)
            .await
            .map_err(map_inventory_error)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
