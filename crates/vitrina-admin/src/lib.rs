//! # Vitrina Admin
//!
//! Application layer of the store dashboard: configuration, logging, page
//! state and the commands a UI shell calls.
//!
//! ## Module Organization
//! ```text
//! vitrina_admin/
//! ├── lib.rs          ◄─── You are here (startup)
//! ├── config.rs       ◄─── vitrina.toml + VITRINA_* overrides
//! ├── error.rs        ◄─── ApiError returned by commands
//! ├── state/
//! │   ├── db.rs       ◄─── Database wrapper
//! │   ├── categories.rs ◄─ Category list + reorder session
//! │   └── shipping.rs ◄─── Shipping settings form
//! └── commands/
//!     ├── store.rs    ◄─── Store bootstrap, profile, SEO, language
//!     ├── categories.rs
//!     ├── products.rs
//!     ├── shipping.rs ◄─── Shipping form + delivery quotes
//!     ├── zones.rs
//!     └── pages.rs
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. AdminConfig::load      file → VITRINA_* env → validate              │
//! │  2. init_tracing           RUST_LOG, else logging.filter                │
//! │  3. Database::new          SQLite (WAL) + pending migrations            │
//! │  4. AppState::new          DbState + empty page states                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use vitrina_db::Database;

pub use config::AdminConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Calling it twice is harmless.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vitrina_db=trace` - Trace the database layer only
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads configuration, starts logging and opens the database.
pub async fn start(config: AdminConfig) -> ApiResult<AppState> {
    init_tracing(&config.logging.filter);
    info!("Starting Vitrina admin");

    let db_config = config.db_config()?;
    info!(path = ?db_config.database_path, "Database path determined");

    let db = Database::new(db_config).await?;
    info!("Database connected and migrations applied");

    Ok(AppState::new(config, db))
}
