//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      CoreError (rule checked before write) │
//! │       │                                │                                │
//! │       ▼                                ▼                                │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (vitrina-admin) ← Serialized for the dashboard               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use vitrina_core::{CoreError, ValidationError};

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - ID doesn't exist
    /// - ID exists but belongs to another store
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate SKU inside a store
    /// - Subdomain already claimed
    /// - Any UNIQUE index violation
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A non-transactional batch stopped part way.
    ///
    /// ## When This Occurs
    /// Category order batches are applied one row at a time. If row
    /// `applied + 1` fails, the first `applied` rows stay written and the
    /// caller has to re-read the authoritative order.
    #[error("Batch stopped after {applied} of {total} updates (failed on {failed_id}): {reason}")]
    PartialBatch {
        applied: usize,
        total: usize,
        failed_id: String,
        reason: String,
    },

    /// A domain rule rejected the write before it reached SQLite.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// A JSON column could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when the caller should reload state before retrying.
    pub fn requires_resync(&self) -> bool {
        matches!(self, DbError::PartialBatch { .. })
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

/// Column name from a SQLite constraint message.
///
/// `"UNIQUE constraint failed: categories.store_id, categories.slug"` → `"slug"`
fn constraint_field(msg: &str) -> String {
    msg.split("UNIQUE constraint failed: ")
        .nth(1)
        .and_then(|cols| cols.split(',').last())
        .map(|col| col.trim().rsplit('.').next().unwrap_or(col).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("UNIQUE constraint failed") {
                    DbError::UniqueViolation {
                        field: constraint_field(msg),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_field() {
        assert_eq!(
            constraint_field("UNIQUE constraint failed: categories.store_id, categories.slug"),
            "slug"
        );
        assert_eq!(
            constraint_field("UNIQUE constraint failed: stores.subdomain"),
            "subdomain"
        );
        assert_eq!(constraint_field("something else"), "unknown");
    }

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err: DbError = CoreError::CategoryNotFound("c1".into()).into();
        assert_eq!(err.to_string(), "Category not found: c1");

        let err: DbError = ValidationError::required("sku").into();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }
}
