//! Category registry service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::catalog::Category;
use crate::domain::error::Error;
use crate::domain::ports::{
    CategoryOps, CategoryRepository, CategoryRepositoryError, InventoryRepository,
    InventoryRepositoryError,
};

/// Category service implementing the driving port.
///
/// Deletion consults the inventory store so a category still referenced by
/// items cannot be removed.
#[derive(Clone)]
pub struct CategoryService<C, I> {
    categories: Arc<C>,
    inventory: Arc<I>,
}

impl<C, I> CategoryService<C, I> {
    /// Create a new service over the given repositories.
    pub fn new(categories: Arc<C>, inventory: Arc<I>) -> Self {
        Self {
            categories,
            inventory,
        }
    }
}

fn map_category_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("category repository unavailable: {message}"))
        }
        CategoryRepositoryError::Query { message } => {
            Error::internal(format!("category repository error: {message}"))
        }
        CategoryRepositoryError::DuplicateName { .. } => {
            Error::invalid_request("a category with this name already exists")
        }
    }
}

fn map_inventory_error(error: InventoryRepositoryError) -> Error {
    match error {
        InventoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("inventory repository unavailable: {message}"))
        }
        InventoryRepositoryError::Query { message }
        | InventoryRepositoryError::DuplicateCode { message } => {
            Error::internal(format!("inventory repository error: {message}"))
        }
    }
}

#[async_trait]
impl<C, I> CategoryOps for CategoryService<C, I>
where
    C: CategoryRepository,
    I: InventoryRepository,
{
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.categories
            .list_by_name()
            .await
            .map_err(map_category_error)
    }

    async fn add_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Category, Error> {
        let name = Category::normalise_name(&name)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let category = Category {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: Utc::now(),
        };
        self.categories
            .insert(&category)
            .await
            .map_err(map_category_error)?;
        tracing::info!(category_id = %category.id, name = %category.name, "category added");
        Ok(category)
    }

    async fn delete_category(&self, category_id: Uuid) -> Result<(), Error> {
        let in_use = self
            .inventory
            .count_in_category(category_id)
            .await
            .map_err(map_inventory_error)?;
        if in_use > 0 {
            return Err(Error::invalid_request(format!(
                "category is still used by {in_use} inventory item(s); move them first"
            )));
        }
        let deleted = self
            .categories
            .delete(category_id)
            .await
            .map_err(map_category_error)?;
        if !deleted {
            return Err(Error::not_found("category not found"));
        }
        tracing::info!(category_id = %category_id, "category deleted");
        Ok(())
    }
}
