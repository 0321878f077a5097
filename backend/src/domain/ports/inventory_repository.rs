//! Port for inventory persistence.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::inventory::{InventoryItem, InventoryItemView, ItemStatus, ItemSummary};
use crate::domain::user::EmailAddress;

/// Errors raised by inventory repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryRepositoryError {
    /// Repository connection could not be established.
    #[error("inventory repository connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("inventory repository query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
    /// Insert or update violated the serial/product code uniqueness.
    #[error("serial or product code already registered: {message}")]
    DuplicateCode {
        /// Adapter-provided context.
        message: String,
    },
}

impl InventoryRepositoryError {
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

    /// Create a duplicate-code error with the given message.
    pub fn duplicate_code(message: impl Into<String>) -> Self {
        Self::DuplicateCode {
            message: message.into(),
        }
    }
}

/// Full-row changes applied to an existing item.
///
/// Mirrors the admin edit form: every descriptive column is rewritten and
/// the service supplies the recomputed assignment timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChanges {
    /// Replacement display name.
    pub product_name: String,
    /// Replacement manufacturer.
    pub brand: Option<String>,
    /// Replacement model designation.
    pub model: Option<String>,
    /// Replacement serial code.
    pub serial_code: String,
    /// Replacement product code.
    pub product_code: String,
    /// New holder, if any.
    pub assigned_user_email: Option<EmailAddress>,
    /// Replacement category reference.
    pub category_id: Option<Uuid>,
    /// Replacement location note.
    pub location: Option<String>,
    /// Replacement remarks.
    pub notes: Option<String>,
    /// Replacement purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Replacement warranty expiry.
    pub warranty_end_date: Option<NaiveDate>,
    /// Recomputed assignment start.
    pub assignment_date: Option<DateTime<Utc>>,
    /// Recomputed unassignment stamp.
    pub unassignment_date: Option<DateTime<Utc>>,
    /// Replacement status.
    pub status: ItemStatus,
    /// Modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Port for inventory storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Persist a new item.
    ///
    /// Fails with [`InventoryRepositoryError::DuplicateCode`] when the
    /// serial or product code is already registered.
    async fn insert(&self, item: &InventoryItem) -> Result<(), InventoryRepositoryError>;

    /// Apply changes to an existing item.
    ///
    /// Returns `Ok(false)` when no row matched the identifier.
    async fn update(&self, id: Uuid, changes: &ItemChanges)
        -> Result<bool, InventoryRepositoryError>;

    /// Delete an item. Returns `Ok(false)` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, InventoryRepositoryError>;

    /// Fetch an item by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, InventoryRepositoryError>;

    /// Every item joined with its category name, newest first.
    async fn list_detailed(&self) -> Result<Vec<InventoryItemView>, InventoryRepositoryError>;

    /// Items assigned to the given user, newest first, with category names.
    async fn assigned_to(
        &self,
        user: &EmailAddress,
    ) -> Result<Vec<InventoryItemView>, InventoryRepositoryError>;

    /// Summaries of the user's items with status `active`.
    async fn active_assigned_to(
        &self,
        user: &EmailAddress,
    ) -> Result<Vec<ItemSummary>, InventoryRepositoryError>;

    /// Summaries for the given identifiers; unknown identifiers are simply
    /// absent from the result, never an error.
    async fn summaries_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ItemSummary>, InventoryRepositoryError>;

    /// Null out the assignment column for every item held by the user.
    ///
    /// Used when an account is deleted; returns the number of items cleared.
    async fn clear_assignments_for(
        &self,
        user: &EmailAddress,
    ) -> Result<u64, InventoryRepositoryError>;

    /// Number of items referencing the given category.
    async fn count_in_category(&self, category_id: Uuid)
        -> Result<i64, InventoryRepositoryError>;
}

/// Fixture implementation for tests that do not exercise inventory storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInventoryRepository;

#[async_trait]
impl InventoryRepository for FixtureInventoryRepository {
    async fn insert(&self, _item: &InventoryItem) -> Result<(), InventoryRepositoryError> {
        Ok(())
    }

    async fn update(
        &self,
        _id: Uuid,
        _changes: &ItemChanges,
    ) -> Result<bool, InventoryRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, InventoryRepositoryError> {
        Ok(false)
    }

    async fn find_by_id(
        &self,
        _id: Uuid,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError> {
        Ok(None)
    }

    async fn list_detailed(&self) -> Result<Vec<InventoryItemView>, InventoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn assigned_to(
        &self,
        _user: &EmailAddress,
    ) -> Result<Vec<InventoryItemView>, InventoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn active_assigned_to(
        &self,
        _user: &EmailAddress,
    ) -> Result<Vec<ItemSummary>, InventoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn summaries_by_ids(
        &self,
        _ids: &[Uuid],
    ) -> Result<Vec<ItemSummary>, InventoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn clear_assignments_for(
        &self,
        _user: &EmailAddress,
    ) -> Result<u64, InventoryRepositoryError> {
        Ok(0)
    }

    async fn count_in_category(
        &self,
        _category_id: Uuid,
    ) -> Result<i64, InventoryRepositoryError> {
        Ok(0)
    }
}
