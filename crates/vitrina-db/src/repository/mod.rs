//! # Repository Module
//!
//! Database repository implementations for Vitrina.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command                                                               │
//! │       │  db.tenant(store_id).categories().update_categories_order(..)  │
//! │       ▼                                                                 │
//! │  CategoryRepository { pool, store_id }                                 │
//! │  ├── list / get_by_id                                                  │
//! │  ├── create / update / delete     (rules from vitrina-core first)      │
//! │  └── update_categories_order      (one row at a time, no transaction)  │
//! │       │                                                                 │
//! │       ▼  SQL                                                            │
//! │  SQLite                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records are read through `sqlx::FromRow` structs and converted to
//! `vitrina-core` types; JSON columns are decoded on the way out.
//!
//! ## Available Repositories
//!
//! - [`store::StoreRepository`] - Tenant bootstrap and settings
//! - [`category::CategoryRepository`] - Category tree
//! - [`product::ProductRepository`] - Catalog
//! - [`delivery_zone::DeliveryZoneRepository`] - Delivery zones
//! - [`page::PageRepository`] - Informational pages

pub mod category;
pub mod delivery_zone;
pub mod page;
pub mod product;
pub mod store;

/// Generates a new entity id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use vitrina_core::{NewStore, Store};

    use crate::{Database, DbConfig};

    /// In-memory database with one bootstrapped store.
    pub(crate) async fn setup() -> (Database, Store) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db
            .stores()
            .create_store(NewStore {
                owner_id: "owner-1".to_string(),
                store_name: "Bodega Rosa".to_string(),
                subdomain: "bodega-rosa".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        (db, store)
    }
}
