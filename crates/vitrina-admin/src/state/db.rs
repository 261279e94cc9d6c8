//! # Database State
//!
//! Wraps the `Database` connection for use in commands.
//!
//! The `Database` from `vitrina-db` holds a `SqlitePool`, which is already
//! safe to share. Commands run concurrently without extra locking.

use vitrina_db::{Database, TenantDb};

#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Handle scoped to one store's collections.
    pub fn tenant(&self, store_id: &str) -> TenantDb {
        self.db.tenant(store_id)
    }
}
