//! # Admin Commands
//!
//! All operations exposed to the dashboard UI.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── store.rs       ◄─── Subdomain check, store bootstrap, settings
//! ├── categories.rs  ◄─── Category tree CRUD + reorder
//! ├── products.rs    ◄─── Catalog CRUD
//! ├── shipping.rs    ◄─── Shipping form + delivery quotes
//! ├── zones.rs       ◄─── Delivery zones
//! └── pages.rs       ◄─── Informational pages
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI shell                                                               │
//! │  call('reorder_categories', { storeId, scope, draggedId, targetId })    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn reorder_categories(                                           │
//! │      app: &AppState,          ◄── shared state                          │
//! │      store_id: &str,          ◄── tenant of the signed-in owner         │
//! │      request: ReorderRequest, ◄── deserialized payload                  │
//! │  ) -> ApiResult<CategoryListDto>                                        │
//! │         │                                                               │
//! │         ▼  (JSON serialization, camelCase)                              │
//! │  UI receives CategoryListDto or ApiError { code, message }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command takes the store id explicitly; repositories never reach
//! outside that store.

pub mod categories;
pub mod pages;
pub mod products;
pub mod shipping;
pub mod store;
pub mod zones;
