//! # Error Types
//!
//! Domain-specific error types for vitrina-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vitrina-core errors (this file)                                       │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vitrina-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  vitrina-admin errors                                                  │
//! │  └── ApiError         - What the dashboard sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Dashboard    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. Every variant carries enough
/// context to render an inline field error or a toast.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Category id is not part of the loaded tree.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Another category in the store already derives this slug.
    ///
    /// ## When This Occurs
    /// - Creating "Café" when "cafe" exists
    /// - Renaming a category onto a sibling's name
    #[error("A category named '{name}' already exists (slug '{slug}')")]
    DuplicateSlug { name: String, slug: String },

    /// Parent category still has subcategories.
    ///
    /// ## User Workflow
    /// ```text
    /// Delete "Bebidas"
    ///      │
    ///      ▼
    /// 2 subcategories found
    ///      │
    ///      ▼
    /// HasSubcategories { name: "Bebidas", count: 2 }
    ///      │
    ///      ▼
    /// UI shows: "Delete its 2 subcategories first"
    /// ```
    #[error("Category '{name}' has {count} subcategories and cannot be deleted")]
    HasSubcategories { name: String, count: usize },

    /// Requested parent is itself a subcategory (tree depth is capped at 2).
    #[error("Category {parent_id} is a subcategory and cannot hold subcategories")]
    InvalidParent { parent_id: String },

    /// Reorder ids do not belong to the same sibling group.
    #[error("Categories {from_id} and {to_id} are not siblings")]
    CrossGroupReorder { from_id: String, to_id: String },

    /// Product subcategory does not belong to its category.
    #[error("Subcategory {subcategory_id} does not belong to category {category_id}")]
    SubcategoryMismatch {
        category_id: String,
        subcategory_id: String,
    },

    /// Stock is tracked on both the product and its variants (or neither).
    #[error("Invalid stock tracking: {reason}")]
    InvalidStockTracking { reason: String },

    /// Subdomain is well formed but already in use.
    #[error("Subdomain '{0}' is not available")]
    SubdomainTaken(String),

    /// An owner may only have one store.
    #[error("Owner {0} already has a store")]
    OwnerAlreadyHasStore(String),

    /// Quote requested for a delivery mode the store does not offer.
    #[error("Delivery mode {0} is not enabled for this store")]
    ShippingModeDisabled(String),

    /// The reorder session received an event its current state cannot take.
    #[error("Cannot {action} while reorder session is {state}")]
    InvalidReorderTransition { action: String, state: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements and are raised
/// before any persistence is attempted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, bad subdomain characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is on a deny list (reserved subdomains).
    #[error("{field} '{value}' is reserved")]
    Reserved { field: String, value: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::HasSubcategories {
            name: "Bebidas".to_string(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Category 'Bebidas' has 2 subcategories and cannot be deleted"
        );

        let err = CoreError::DuplicateSlug {
            name: "Café".to_string(),
            slug: "cafe".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "A category named 'Café' already exists (slug 'cafe')"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("sku").to_string(), "sku is required");

        let err = ValidationError::Reserved {
            field: "subdomain".to_string(),
            value: "www".to_string(),
        };
        assert_eq!(err.to_string(), "subdomain 'www' is reserved");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
