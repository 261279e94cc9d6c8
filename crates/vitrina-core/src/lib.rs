//! # vitrina-core: Pure Business Logic for Vitrina
//!
//! Domain rules of the store dashboard with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vitrina Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard UI shell                           │   │
//! │  │   Categories list ──► Product form ──► Shipping ──► Settings    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vitrina-admin                                │   │
//! │  │   page state (CategoryListState, ShippingFormState), ApiError   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ vitrina-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐ ┌───────────┐ ┌──────────┐ ┌────────────────┐  │   │
//! │  │  │ category_  │ │ shipping  │ │ reorder  │ │ validation     │  │   │
//! │  │  │ tree       │ │ merge     │ │ session  │ │ slug, zone,    │  │   │
//! │  │  │ ordering   │ │ quote     │ │ gesture  │ │ pages, money   │  │   │
//! │  │  └────────────┘ └───────────┘ └──────────┘ └────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vitrina-db (Database Layer)                  │   │
//! │  │          SQLite per-store tables, migrations, repositories      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Store, Category, Product, ...)
//! - [`category_tree`] - Sibling ordering, reorder, delete/slug guards
//! - [`reorder`] - Drag gesture and reorder session state machine
//! - [`shipping`] - Shipping configuration, stored-config merge, quotes
//! - [`zone`] - Delivery zone geometry
//! - [`pages`] - Default informational pages
//! - [`slug`] - Slug derivation
//! - [`money`] - Integer money
//! - [`validation`] - Field validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use vitrina_core::category_tree::reorder_parents;
//! use vitrina_core::slug::slugify;
//!
//! assert_eq!(slugify("Café & Té"), "cafe-te");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod category_tree;
pub mod error;
pub mod money;
pub mod pages;
pub mod reorder;
pub mod shipping;
pub mod slug;
pub mod types;
pub mod validation;
pub mod zone;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pages::{Page, PageKind};
pub use shipping::{ShippingConfig, ShippingUpdate, StoredShippingConfig};
pub use types::*;
pub use zone::{DeliveryZone, DeliveryZoneInput, ZoneShape};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Subdomains that can never be claimed by a store.
///
/// Infrastructure hosts plus words that would impersonate the platform.
pub const RESERVED_SUBDOMAINS: &[&str] = &[
    "www", "api", "app", "admin", "dashboard", "mail", "smtp", "ftp", "cdn", "static", "assets",
    "blog", "help", "support", "status", "docs", "dev", "staging", "test", "login", "signup",
    "account", "billing", "shop", "store", "tienda", "vitrina",
];

pub const SUBDOMAIN_MIN_LEN: usize = 3;

/// DNS labels allow 63; the storefront URL stays readable at 50.
pub const SUBDOMAIN_MAX_LEN: usize = 50;

pub const MAX_SEO_TITLE_LEN: usize = 60;
pub const MAX_SEO_DESCRIPTION_LEN: usize = 160;
pub const MAX_SEO_KEYWORDS: usize = 20;

/// Pointer travel (px) before a press on a list row becomes a drag.
pub const DRAG_ACTIVATION_DISTANCE: f64 = 8.0;

/// Version stamped on every merged shipping configuration.
pub const SHIPPING_SCHEMA_VERSION: u32 = 1;
