//! # Validation Module
//!
//! Input validation for dashboard forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard form (TypeScript)                                  │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: vitrina-admin command (Rust)                                 │
//! │  └── THIS MODULE: field and business rule validation                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: vitrina-db repository                                        │
//! │  ├── Uniqueness lookups (slug, sku, subdomain)                         │
//! │  └── UNIQUE / foreign key constraints                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{LanguageSettings, LocalizedText, ProductInput, SeoConfig, StockTracking};
use crate::{
    MAX_SEO_DESCRIPTION_LEN, MAX_SEO_KEYWORDS, MAX_SEO_TITLE_LEN, RESERVED_SUBDOMAINS,
    SUBDOMAIN_MAX_LEN, SUBDOMAIN_MIN_LEN,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ```rust
/// use vitrina_core::validation::validate_sku;
///
/// assert!(validate_sku("POLO-M-ROJO").is_ok());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::invalid(
            "sku",
            "must contain only letters, numbers, hyphens, and underscores",
        ));
    }

    Ok(())
}

/// Validates a product name (1-200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a category name.
///
/// The Spanish name is mandatory because the slug is derived from it, and it
/// must keep at least one slug character. English is optional.
pub fn validate_category_name(name: &LocalizedText) -> ValidationResult<()> {
    let es = name.es.trim();

    if es.is_empty() {
        return Err(ValidationError::required("name.es"));
    }

    for (field, value) in [("name.es", es), ("name.en", name.en.trim())] {
        if value.chars().count() > 100 {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max: 100,
            });
        }
    }

    if crate::slug::slugify(es).is_empty() {
        return Err(ValidationError::invalid(
            "name.es",
            "must contain at least one letter or number",
        ));
    }

    Ok(())
}

/// Validates the display name of a store (2-80 characters).
pub fn validate_store_name(name: &str) -> ValidationResult<()> {
    let len = name.trim().chars().count();

    if len == 0 {
        return Err(ValidationError::required("storeName"));
    }

    if len < 2 {
        return Err(ValidationError::TooShort {
            field: "storeName".to_string(),
            min: 2,
        });
    }

    if len > 80 {
        return Err(ValidationError::TooLong {
            field: "storeName".to_string(),
            max: 80,
        });
    }

    Ok(())
}

/// Validates a storefront subdomain.
///
/// ## Rules
/// - 3 to 50 characters
/// - Only `[a-z0-9-]`
/// - No leading or trailing hyphen, no `--`
/// - Not a reserved word
///
/// ## User Workflow
/// ```text
/// Owner types "my--shop"
///      │
///      ▼
/// validate_subdomain ← THIS FUNCTION
///      │
///      ├── bad format / reserved? → inline field error
///      │
///      └── OK → StoreRepository::check_subdomain_availability (DB lookup)
/// ```
///
/// ```rust
/// use vitrina_core::validation::validate_subdomain;
///
/// assert!(validate_subdomain("mi-tienda").is_ok());
/// assert!(validate_subdomain("www").is_err());
/// assert!(validate_subdomain("my--shop").is_err());
/// ```
pub fn validate_subdomain(subdomain: &str) -> ValidationResult<()> {
    let len = subdomain.len();

    if len == 0 {
        return Err(ValidationError::required("subdomain"));
    }

    if len < SUBDOMAIN_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "subdomain".to_string(),
            min: SUBDOMAIN_MIN_LEN,
        });
    }

    if len > SUBDOMAIN_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "subdomain".to_string(),
            max: SUBDOMAIN_MAX_LEN,
        });
    }

    if !subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::invalid(
            "subdomain",
            "only lowercase letters, numbers and hyphens are allowed",
        ));
    }

    if subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(ValidationError::invalid(
            "subdomain",
            "cannot start or end with a hyphen",
        ));
    }

    if subdomain.contains("--") {
        return Err(ValidationError::invalid(
            "subdomain",
            "cannot contain consecutive hyphens",
        ));
    }

    if RESERVED_SUBDOMAINS.contains(&subdomain) {
        return Err(ValidationError::Reserved {
            field: "subdomain".to_string(),
            value: subdomain.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price or cost in cents. Zero is allowed.
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates where stock is counted.
///
/// ## Rules
/// - `PerVariant` needs at least one variant
/// - `Product` and `Untracked` forbid variant-level stock
/// - Stock quantities cannot be negative
pub fn validate_stock_tracking(
    stock: &StockTracking,
    variants: &[crate::types::ProductVariant],
) -> CoreResult<()> {
    match stock {
        StockTracking::PerVariant => {
            if variants.is_empty() {
                return Err(CoreError::InvalidStockTracking {
                    reason: "per-variant stock requires at least one variant".to_string(),
                });
            }
            if variants.iter().any(|v| v.stock.is_some_and(|s| s < 0)) {
                return Err(ValidationError::Negative {
                    field: "variant stock".to_string(),
                }
                .into());
            }
        }
        StockTracking::Product { quantity } => {
            if *quantity < 0 {
                return Err(ValidationError::Negative {
                    field: "stockQuantity".to_string(),
                }
                .into());
            }
            if variants.iter().any(|v| v.stock.is_some()) {
                return Err(CoreError::InvalidStockTracking {
                    reason: "stock is tracked on the product; variants cannot carry stock"
                        .to_string(),
                });
            }
        }
        StockTracking::Untracked => {
            if variants.iter().any(|v| v.stock.is_some()) {
                return Err(CoreError::InvalidStockTracking {
                    reason: "stock is not tracked; variants cannot carry stock".to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Validates a product form before it reaches the database.
///
/// Uniqueness of the SKU is a database concern and is checked by the
/// repository afterwards.
pub fn validate_product_input(input: &ProductInput) -> CoreResult<()> {
    validate_product_name(&input.name)?;

    // a blank SKU box means no SKU
    if let Some(sku) = input.sku.as_deref().filter(|s| !s.trim().is_empty()) {
        validate_sku(sku)?;
    }

    validate_price_cents("price", input.price_cents)?;
    if let Some(compare_at) = input.compare_at_price_cents {
        validate_price_cents("compareAtPrice", compare_at)?;
    }

    if input.subcategory_id.is_some() && input.category_id.is_none() {
        return Err(ValidationError::required("categoryId").into());
    }

    for variant in &input.variants {
        if variant.name.trim().is_empty() {
            return Err(ValidationError::required("variant name").into());
        }
        if let Some(sku) = variant.sku.as_deref().filter(|s| !s.trim().is_empty()) {
            validate_sku(sku)?;
        }
        if let Some(price) = variant.price_cents {
            validate_price_cents("variant price", price)?;
        }
    }

    validate_stock_tracking(&input.stock, &input.variants)
}

// =============================================================================
// Settings Validators
// =============================================================================

/// Validates SEO metadata lengths.
pub fn validate_seo(seo: &SeoConfig) -> ValidationResult<()> {
    if seo.meta_title.chars().count() > MAX_SEO_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "metaTitle".to_string(),
            max: MAX_SEO_TITLE_LEN,
        });
    }

    if seo.meta_description.chars().count() > MAX_SEO_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "metaDescription".to_string(),
            max: MAX_SEO_DESCRIPTION_LEN,
        });
    }

    if seo.keywords.len() > MAX_SEO_KEYWORDS {
        return Err(ValidationError::OutOfRange {
            field: "keywords".to_string(),
            min: 0,
            max: MAX_SEO_KEYWORDS as i64,
        });
    }

    if seo.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ValidationError::invalid("keywords", "blank keyword"));
    }

    Ok(())
}

/// Validates language settings: the default must be enabled.
pub fn validate_language_settings(settings: &LanguageSettings) -> ValidationResult<()> {
    if settings.enabled.is_empty() {
        return Err(ValidationError::required("enabled languages"));
    }

    if !settings.enabled.contains(&settings.default_language) {
        return Err(ValidationError::invalid(
            "defaultLanguage",
            "must be one of the enabled languages",
        ));
    }

    Ok(())
}

impl SeoConfig {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_seo(self)
    }
}

impl LanguageSettings {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_language_settings(self)
    }
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id)
        .map_err(|_| ValidationError::invalid("id", "must be a valid UUID"))?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Language, ProductVariant};
    use std::collections::HashMap;

    fn variant(stock: Option<i64>) -> ProductVariant {
        ProductVariant {
            id: "v1".to_string(),
            name: "M".to_string(),
            sku: None,
            price_cents: None,
            stock,
            options: HashMap::new(),
        }
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("POLO-M").is_ok());
        assert!(validate_sku("polo_1").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_subdomain() {
        assert!(validate_subdomain("mi-tienda").is_ok());
        assert!(validate_subdomain("abc").is_ok());
        assert!(validate_subdomain(&"a".repeat(50)).is_ok());

        assert!(matches!(
            validate_subdomain("www"),
            Err(ValidationError::Reserved { .. })
        ));
        assert!(validate_subdomain("my--shop").is_err());
        assert!(validate_subdomain("-shop").is_err());
        assert!(validate_subdomain("shop-").is_err());
        assert!(validate_subdomain("ab").is_err());
        assert!(validate_subdomain(&"a".repeat(51)).is_err());
        assert!(validate_subdomain("Mi-Tienda").is_err());
        assert!(validate_subdomain("tienda_1").is_err());
        assert!(validate_subdomain("").is_err());
    }

    #[test]
    fn test_validate_category_name() {
        assert!(validate_category_name(&LocalizedText::new("Bebidas", "")).is_ok());
        assert!(validate_category_name(&LocalizedText::new("  ", "Drinks")).is_err());
        assert!(validate_category_name(&LocalizedText::new("&&", "")).is_err());
        assert!(validate_category_name(&LocalizedText::new("a".repeat(101), "")).is_err());
    }

    #[test]
    fn test_validate_store_name() {
        assert!(validate_store_name("Bodega Lucía").is_ok());
        assert!(validate_store_name("").is_err());
        assert!(validate_store_name("x").is_err());
        assert!(validate_store_name(&"x".repeat(81)).is_err());
    }

    #[test]
    fn test_stock_on_product_or_variants_never_both() {
        assert!(validate_stock_tracking(&StockTracking::PerVariant, &[variant(Some(3))]).is_ok());
        assert!(validate_stock_tracking(&StockTracking::PerVariant, &[]).is_err());
        assert!(validate_stock_tracking(
            &StockTracking::Product { quantity: 4 },
            &[variant(None)]
        )
        .is_ok());
        assert!(validate_stock_tracking(
            &StockTracking::Product { quantity: 4 },
            &[variant(Some(1))]
        )
        .is_err());
        assert!(validate_stock_tracking(&StockTracking::Untracked, &[variant(Some(1))]).is_err());
        assert!(
            validate_stock_tracking(&StockTracking::Product { quantity: -1 }, &[]).is_err()
        );
    }

    #[test]
    fn test_validate_product_input() {
        let mut input = ProductInput {
            name: "Polo básico".to_string(),
            price_cents: 3_990,
            ..Default::default()
        };
        assert!(validate_product_input(&input).is_ok());

        input.sku = Some("bad sku".to_string());
        assert!(validate_product_input(&input).is_err());

        input.sku = Some(String::new());
        assert!(validate_product_input(&input).is_ok());
        input.sku = Some("   ".to_string());
        assert!(validate_product_input(&input).is_ok());

        input.sku = None;
        input.subcategory_id = Some("child".to_string());
        assert!(validate_product_input(&input).is_err());

        input.subcategory_id = None;
        input.price_cents = -1;
        assert!(validate_product_input(&input).is_err());
    }

    #[test]
    fn test_validate_seo() {
        let mut seo = SeoConfig {
            meta_title: "Bodega Lucía".to_string(),
            ..Default::default()
        };
        assert!(validate_seo(&seo).is_ok());

        seo.meta_title = "t".repeat(61);
        assert!(validate_seo(&seo).is_err());

        seo.meta_title.clear();
        seo.keywords = vec!["ok".to_string(), " ".to_string()];
        assert!(validate_seo(&seo).is_err());
    }

    #[test]
    fn test_validate_language_settings() {
        assert!(validate_language_settings(&LanguageSettings::default()).is_ok());

        let settings = LanguageSettings {
            default_language: Language::En,
            enabled: vec![Language::Es],
        };
        assert!(validate_language_settings(&settings).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
