//! Driving port for the category registry.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::Category;
use crate::domain::error::Error;

/// Driving port for category operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryOps: Send + Sync {
    /// Every category, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;

    /// Register a new category.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error for a blank name or a name that is
    /// already taken.
    async fn add_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Category, Error>;

    /// Remove a category.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error while inventory items still
    /// reference the category and a not-found error when no category
    /// matches.
    async fn delete_category(&self, category_id: Uuid) -> Result<(), Error>;
}

/// Fixture implementation with no categories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryOps;

#[async_trait]
impl CategoryOps for FixtureCategoryOps {
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        Ok(Vec::new())
    }

    async fn add_category(
        &self,
        _name: String,
        _description: Option<String>,
    ) -> Result<Category, Error> {
        Err(Error::internal("category fixture has no storage"))
    }

    async fn delete_category(&self, _category_id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("category not found"))
    }
}
