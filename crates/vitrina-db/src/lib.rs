//! # vitrina-db: Database Layer for Vitrina
//!
//! Persistent storage for stores and their per-store collections, on SQLite
//! through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vitrina Data Flow                                │
//! │                                                                         │
//! │  vitrina-admin command (reorder_categories)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vitrina-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │  Repositories      │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │  │   │
//! │  │   │               │    │ StoreRepository    │  │            │  │   │
//! │  │   │ SqlitePool    │◄───│ CategoryRepository │  │ 001_init   │  │   │
//! │  │   │ TenantDb      │    │ ProductRepository  │  │            │  │   │
//! │  │   │               │    │ DeliveryZoneRepo   │  │            │  │   │
//! │  │   │               │    │ PageRepository     │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vitrina_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("vitrina.db")).await?;
//! let store = db.stores().get_by_owner("owner-1").await?;
//! let tree = db.tenant(&store.id).categories().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, TenantDb};

pub use repository::category::CategoryRepository;
pub use repository::delivery_zone::DeliveryZoneRepository;
pub use repository::page::PageRepository;
pub use repository::product::ProductRepository;
pub use repository::store::StoreRepository;
