//! # Domain Types
//!
//! Core domain types shared by the database layer and the dashboard.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Store       │   │    Category     │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  store_id       │◄──│  category_id    │       │
//! │  │  owner_id       │   │  slug           │   │  sku (optional) │       │
//! │  │  subdomain      │   │  parent_id?     │   │  stock          │       │
//! │  │  advanced.*     │   │  order          │   │  variants[]     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Per-store collections: categories, products, delivery_zones, pages    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations
//! - Business key: (slug, sku, subdomain) - human-readable, mutable

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::shipping::StoredShippingConfig;

// =============================================================================
// Localized Text
// =============================================================================

/// Text stored in both dashboard languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LocalizedText {
    pub es: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(es: impl Into<String>, en: impl Into<String>) -> Self {
        LocalizedText {
            es: es.into(),
            en: en.into(),
        }
    }

    /// Returns the text for a language, falling back to Spanish when the
    /// English translation is blank.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En if !self.en.trim().is_empty() => &self.en,
            _ => &self.es,
        }
    }
}

/// Dashboard / storefront languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl std::str::FromStr for Language {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "spanish" | "español" => Ok(Language::Es),
            "en" | "english" => Ok(Language::En),
            other => Err(crate::error::ValidationError::invalid(
                "language",
                format!("unknown language '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// A node of the two-level category tree.
///
/// `parent_category_id == None` marks a parent category; anything else is a
/// subcategory of exactly one parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub store_id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    /// Derived from `name.es`, unique per store.
    pub slug: String,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub parent_category_id: Option<String>,
    /// Position inside the sibling group, starting at 1.
    pub order: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    #[inline]
    pub fn is_parent(&self) -> bool {
        self.parent_category_id.is_none()
    }

    #[inline]
    pub fn is_child_of(&self, parent_id: &str) -> bool {
        self.parent_category_id.as_deref() == Some(parent_id)
    }

    /// True when both categories share a sibling group.
    #[inline]
    pub fn is_sibling_of(&self, other: &Category) -> bool {
        self.parent_category_id == other.parent_category_id
    }
}

/// Form input for creating a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub parent_category_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_public_id: Option<String>,
}

/// Form input for editing a category.
///
/// `None` fields are left untouched. Changing `name` regenerates the slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<LocalizedText>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    /// Replacement image.
    #[serde(default)]
    pub image: Option<ImageRef>,
    /// Drops the current image when no replacement is given.
    #[serde(default)]
    pub remove_image: bool,
}

/// Result of applying a [`CategoryPatch`].
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedCategory {
    pub category: Category,
    /// `public_id` of an image the patch replaced or removed, to be deleted
    /// from the image host.
    pub removed_image_public_id: Option<String>,
}

/// Reference to an asset on the external media host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub url: String,
    pub public_id: String,
}

/// One `{id, order}` pair produced by a reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderUpdate {
    pub id: String,
    pub order: i64,
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductCondition {
    #[default]
    New,
    Used,
    Refurbished,
}

/// Unit the product is sold by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductUnit {
    #[default]
    Piece,
    Kg,
    Gram,
    Liter,
    Meter,
    Pack,
}

/// Where stock is counted.
///
/// Stock lives on the product or on its variants, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StockTracking {
    /// Stock is not tracked (made to order, digital goods).
    #[default]
    Untracked,
    /// A single counter on the product.
    Product { quantity: i64 },
    /// Each variant carries its own `stock`.
    PerVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Overrides the product price when set.
    #[serde(default)]
    pub price_cents: Option<i64>,
    /// Only meaningful with [`StockTracking::PerVariant`].
    #[serde(default)]
    pub stock: Option<i64>,
    /// Option values, e.g. `{"talla": "M", "color": "rojo"}`.
    #[serde(default)]
    pub options: HashMap<String, String>,
}

/// A product in a store's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub description: Option<String>,
    pub brand_id: Option<String>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
    /// Unique per store when present.
    pub sku: Option<String>,
    pub unit: ProductUnit,
    pub condition: ProductCondition,
    pub status: ProductStatus,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock: StockTracking,
    pub variants: Vec<ProductVariant>,
    pub images: Vec<ImageRef>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Units available for sale, `None` when stock is untracked.
    pub fn available_stock(&self) -> Option<i64> {
        match &self.stock {
            StockTracking::Untracked => None,
            StockTracking::Product { quantity } => Some(*quantity),
            StockTracking::PerVariant => {
                Some(self.variants.iter().filter_map(|v| v.stock).sum())
            }
        }
    }
}

/// Form input for creating or replacing a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub subcategory_id: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub unit: ProductUnit,
    #[serde(default)]
    pub condition: ProductCondition,
    #[serde(default)]
    pub status: ProductStatus,
    pub price_cents: i64,
    #[serde(default)]
    pub compare_at_price_cents: Option<i64>,
    #[serde(default)]
    pub stock: StockTracking,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

// =============================================================================
// Store (Tenant)
// =============================================================================

/// The store's general address, used by store pickup and maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreLocation {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl StoreLocation {
    pub fn has_address(&self) -> bool {
        !self.address.trim().is_empty()
    }
}

/// Search engine and social metadata for the storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoConfig {
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
    pub og_image_url: Option<String>,
    pub og_image_public_id: Option<String>,
    pub google_analytics_id: Option<String>,
    pub facebook_pixel_id: Option<String>,
}

/// Storefront language settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageSettings {
    pub default_language: Language,
    pub enabled: Vec<Language>,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        LanguageSettings {
            default_language: Language::Es,
            enabled: vec![Language::Es],
        }
    }
}

/// The `advanced` block of a store document.
///
/// `shipping` keeps whatever was persisted, possibly partial or written by
/// an older schema. Use [`crate::shipping::merge_shipping_config`] to get a
/// complete [`crate::shipping::ShippingConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedSettings {
    pub shipping: Option<StoredShippingConfig>,
    pub seo: SeoConfig,
    pub language: LanguageSettings,
}

/// A tenant: one merchant's isolated partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub owner_id: String,
    pub store_name: String,
    /// Globally unique storefront subdomain.
    pub subdomain: String,
    pub location: StoreLocation,
    pub advanced: AdvancedSettings,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Form input for the "create your store" flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
    pub owner_id: String,
    pub store_name: String,
    pub subdomain: String,
    #[serde(default)]
    pub location: StoreLocation,
    #[serde(default)]
    pub language: LanguageSettings,
}

// =============================================================================
// Unit Tests
// =============================================================================
