//! # API Error Type
//!
//! Unified error type for admin commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Vitrina Admin                          │
//! │                                                                         │
//! │  Dashboard UI                Rust Backend                               │
//! │  ────────────                ────────────                               │
//! │                                                                         │
//! │  call('create_category')                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  ApiResult<T>                                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Rule broken? ─── CoreError::DuplicateSlug ───────┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Database Error? ─── DbError::QueryFailed ─── ApiError ─────────►│  │
//! │  │         │             (logged, generic text)                     │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  catch (e) {                                                            │
//! │    // e.code = "CONFLICT"                                               │
//! │    // e.message = "A category named 'Café' already exists ..."          │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;
use vitrina_core::{CoreError, ValidationError};
use vitrina_db::DbError;

use crate::config::ConfigError;

/// Result alias for admin commands.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error returned from admin commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Category not found: 1f0c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Slug, SKU, subdomain or owner already taken (409)
    Conflict,

    /// A rule of the store rejected the action (422)
    BusinessLogic,

    /// A category order batch stopped part way; the list was reloaded
    ReorderFailed,

    /// The backend refused access
    PermissionDenied,

    /// Database operation failed (500)
    DatabaseError,

    /// Configuration could not be loaded or saved
    ConfigError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn business(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BusinessLogic, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Maps a raw backend failure to a user-facing error.
    ///
    /// Messages mentioning `permission-denied` or `not-found` get a
    /// friendlier text; anything else is logged and hidden behind a
    /// generic message.
    fn backend(context: &str, raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("permission-denied")
            || lower.contains("permission denied")
            || lower.contains("readonly")
        {
            tracing::warn!(context, error = %raw, "Backend refused access");
            return ApiError::new(
                ErrorCode::PermissionDenied,
                "You do not have permission to change this store",
            );
        }
        if lower.contains("not-found") || lower.contains("no such") {
            tracing::warn!(context, error = %raw, "Backend data missing");
            return ApiError::new(
                ErrorCode::NotFound,
                "The requested data no longer exists. Reload and try again",
            );
        }

        tracing::error!(context, error = %raw, "Database operation failed");
        ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::PartialBatch {
                applied,
                total,
                failed_id,
                reason,
            } => {
                tracing::warn!(applied, total, failed_id = %failed_id, reason = %reason, "Reorder batch failed");
                ApiError::new(
                    ErrorCode::ReorderFailed,
                    format!(
                        "The new order could not be saved ({} of {} changes applied). The list was reloaded",
                        applied, total
                    ),
                )
            }
            DbError::Domain(e) => ApiError::from(e),
            DbError::Serialization(e) => {
                tracing::error!("Stored document unreadable: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Stored data could not be read")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => ApiError::backend("query", &e),
            DbError::TransactionFailed(e) => ApiError::backend("transaction", &e),
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => ApiError::backend("internal", &e),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::CategoryNotFound(id) => ApiError::not_found("Category", &id),
            CoreError::DuplicateSlug { .. }
            | CoreError::SubdomainTaken(_)
            | CoreError::OwnerAlreadyHasStore(_) => ApiError::new(ErrorCode::Conflict, message),
            CoreError::InvalidParent { .. }
            | CoreError::SubcategoryMismatch { .. }
            | CoreError::InvalidStockTracking { .. } => ApiError::validation(message),
            CoreError::HasSubcategories { .. }
            | CoreError::CrossGroupReorder { .. }
            | CoreError::ShippingModeDisabled(_)
            | CoreError::InvalidReorderTransition { .. } => ApiError::business(message),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err: ApiError = DbError::Domain(CoreError::DuplicateSlug {
            name: "Café".into(),
            slug: "cafe".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(err.message.contains("Café"));

        let err: ApiError = CoreError::HasSubcategories {
            name: "Bebidas".into(),
            count: 2,
        }
        .into();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_backend_messages_are_softened() {
        let err: ApiError = DbError::QueryFailed("permission-denied: missing rights".into()).into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(!err.message.contains("missing rights"));

        let err: ApiError = DbError::QueryFailed("not-found: stores/abc".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: ApiError = DbError::QueryFailed("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_partial_batch_maps_to_reorder_failed() {
        let err: ApiError = DbError::PartialBatch {
            applied: 2,
            total: 5,
            failed_id: "c3".into(),
            reason: "gone".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ReorderFailed);
        assert!(err.message.contains("2 of 5"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::not_found("Product", "p1")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: p1");
    }
}
