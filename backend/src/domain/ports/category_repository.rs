//! Port for category persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::Category;

/// Errors raised by category repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryRepositoryError {
    /// Repository connection could not be established.
    #[error("category repository connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("category repository query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
    /// Insert violated the name uniqueness constraint.
    #[error("category name already exists: {message}")]
    DuplicateName {
        /// Adapter-provided context.
        message: String,
    },
}

impl CategoryRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-name error with the given message.
    pub fn duplicate_name(message: impl Into<String>) -> Self {
        Self::DuplicateName {
            message: message.into(),
        }
    }
}

/// Port for category storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Every category, ordered by name.
    async fn list_by_name(&self) -> Result<Vec<Category>, CategoryRepositoryError>;

    /// Persist a new category.
    ///
    /// Fails with [`CategoryRepositoryError::DuplicateName`] when the name is
    /// taken.
    async fn insert(&self, category: &Category) -> Result<(), CategoryRepositoryError>;

    /// Delete a category. Returns `Ok(false)` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, CategoryRepositoryError>;
}

/// Fixture implementation for tests that do not exercise category storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryRepository;

#[async_trait]
impl CategoryRepository for FixtureCategoryRepository {
    async fn list_by_name(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _category: &Category) -> Result<(), CategoryRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, CategoryRepositoryError> {
        Ok(false)
    }
}
