//! # State Module
//!
//! Application state shared by the admin commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌─────────────────────────┐  ┌──────────────────────┐│
//! │  │   DbState    │  │  Mutex<                 │  │  Mutex<Option<       ││
//! │  │              │  │    CategoryListState    │  │    ShippingFormState ││
//! │  │  Database    │  │  >                      │  │  >>                  ││
//! │  │  (SQLite     │  │  categories + reorder   │  │  draft + saved       ││
//! │  │   pool)      │  │  session                │  │  config              ││
//! │  └──────────────┘  └─────────────────────────┘  └──────────────────────┘│
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: the pool is shared, no locking                             │
//! │  • Page states: tokio Mutex, held across the awaits of one command     │
//! │    so a reorder and its resync are never interleaved                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod categories;
mod db;
mod shipping;

pub use categories::CategoryListState;
pub use db::DbState;
pub use shipping::ShippingFormState;

use tokio::sync::Mutex;
use vitrina_db::Database;

use crate::config::AdminConfig;

/// Everything a command may need.
#[derive(Debug)]
pub struct AppState {
    pub config: AdminConfig,
    pub db: DbState,
    pub categories: Mutex<CategoryListState>,
    pub shipping: Mutex<Option<ShippingFormState>>,
}

impl AppState {
    pub fn new(config: AdminConfig, db: Database) -> Self {
        AppState {
            config,
            db: DbState::new(db),
            categories: Mutex::new(CategoryListState::new()),
            shipping: Mutex::new(None),
        }
    }
}
