//! Equipment categories.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Domain error returned when category values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    /// The category name was missing or blank once trimmed.
    #[error("category name must not be empty")]
    EmptyName,
}

/// A named grouping of inventory items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Primary identifier.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Check and normalise a proposed category name.
    pub fn normalise_name(raw: &str) -> Result<String, CatalogValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogValidationError::EmptyName);
        }
        Ok(trimmed.to_owned())
    }
}
