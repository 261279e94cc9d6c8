//! # Store Repository
//!
//! The global `stores` table: tenant bootstrap and store-level settings.
//!
//! ## Bootstrap
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_store(NewStore)                                                 │
//! │       │                                                                 │
//! │       ├── validate name, subdomain, languages      (vitrina-core)       │
//! │       ├── owner already has a store?  ──► OwnerAlreadyHasStore          │
//! │       ├── subdomain taken?            ──► SubdomainTaken                │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    INSERT stores                                                        │
//! │    INSERT pages × 6  (home, about, contact, terms, privacy, shipping)   │
//! │  COMMIT                       a store never exists without its pages    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The availability check and the insert are not atomic. Two owners racing
//! for the same subdomain are separated by the UNIQUE index; the loser gets
//! `SubdomainTaken`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use vitrina_core::pages::default_pages;
use vitrina_core::shipping::ShippingConfig;
use vitrina_core::validation::{validate_language_settings, validate_store_name, validate_subdomain};
use vitrina_core::{
    AdvancedSettings, CoreError, LanguageSettings, NewStore, SeoConfig, Store, StoreLocation,
    StoredShippingConfig,
};

use super::generate_id;
use super::page::insert_page;
use crate::error::{DbError, DbResult};

// =============================================================================
// Record
// =============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
struct StoreRecord {
    id: String,
    owner_id: String,
    store_name: String,
    subdomain: String,
    address: String,
    city: String,
    country: String,
    lat: Option<f64>,
    lng: Option<f64>,
    shipping_config: Option<String>,
    seo_config: String,
    language_settings: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const STORE_COLUMNS: &str = r#"
    id, owner_id, store_name, subdomain,
    address, city, country, lat, lng,
    shipping_config, seo_config, language_settings,
    created_at, updated_at
"#;

/// Decodes a settings column, falling back to defaults on bad JSON.
fn decode_or_default<T: DeserializeOwned + Default>(store_id: &str, column: &str, raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(store_id = %store_id, column = %column, error = %e, "Unreadable settings, using defaults");
        T::default()
    })
}

impl StoreRecord {
    fn into_store(self) -> Store {
        let shipping = self
            .shipping_config
            .as_deref()
            .map(|raw| decode_or_default::<StoredShippingConfig>(&self.id, "shipping_config", raw));
        let seo = decode_or_default::<SeoConfig>(&self.id, "seo_config", &self.seo_config);
        let language =
            decode_or_default::<LanguageSettings>(&self.id, "language_settings", &self.language_settings);

        Store {
            id: self.id,
            owner_id: self.owner_id,
            store_name: self.store_name,
            subdomain: self.subdomain,
            location: StoreLocation {
                address: self.address,
                city: self.city,
                country: self.country,
                lat: self.lat,
                lng: self.lng,
            },
            advanced: AdvancedSettings {
                shipping,
                seo,
                language,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the global stores table.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Store>> {
        let sql = format!("SELECT {} FROM stores WHERE id = ?1", STORE_COLUMNS);
        let record = sqlx::query_as::<_, StoreRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(StoreRecord::into_store))
    }

    /// The owner's store. Owners have at most one.
    pub async fn get_by_owner(&self, owner_id: &str) -> DbResult<Option<Store>> {
        debug!(owner_id = %owner_id, "Looking up store by owner");

        let sql = format!("SELECT {} FROM stores WHERE owner_id = ?1", STORE_COLUMNS);
        let record = sqlx::query_as::<_, StoreRecord>(&sql)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(StoreRecord::into_store))
    }

    pub async fn subdomain_exists(&self, subdomain: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores WHERE subdomain = ?1")
            .bind(subdomain)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// `false` when the subdomain is malformed, reserved or already used.
    pub async fn check_subdomain_availability(&self, subdomain: &str) -> DbResult<bool> {
        if let Err(reason) = validate_subdomain(subdomain) {
            debug!(subdomain = %subdomain, reason = %reason, "Subdomain rejected");
            return Ok(false);
        }

        Ok(!self.subdomain_exists(subdomain).await?)
    }

    /// Creates a store together with its default pages in one transaction.
    pub async fn create_store(&self, new_store: NewStore) -> DbResult<Store> {
        let store_name = new_store.store_name.trim().to_string();
        validate_store_name(&store_name)?;
        validate_subdomain(&new_store.subdomain)?;
        validate_language_settings(&new_store.language)?;

        if self.get_by_owner(&new_store.owner_id).await?.is_some() {
            return Err(CoreError::OwnerAlreadyHasStore(new_store.owner_id).into());
        }
        if self.subdomain_exists(&new_store.subdomain).await? {
            return Err(CoreError::SubdomainTaken(new_store.subdomain).into());
        }

        let now = Utc::now();
        let store = Store {
            id: generate_id(),
            owner_id: new_store.owner_id,
            store_name,
            subdomain: new_store.subdomain,
            location: new_store.location,
            advanced: AdvancedSettings {
                shipping: None,
                seo: SeoConfig::default(),
                language: new_store.language,
            },
            created_at: now,
            updated_at: now,
        };
        let pages = default_pages(&store.id, &store.store_name, now);

        info!(
            store_id = %store.id,
            subdomain = %store.subdomain,
            pages = pages.len(),
            "Creating store"
        );

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO stores (
                id, owner_id, store_name, subdomain,
                address, city, country, lat, lng,
                shipping_config, seo_config, language_settings,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&store.id)
        .bind(&store.owner_id)
        .bind(&store.store_name)
        .bind(&store.subdomain)
        .bind(&store.location.address)
        .bind(&store.location.city)
        .bind(&store.location.country)
        .bind(store.location.lat)
        .bind(store.location.lng)
        .bind(serde_json::to_string(&store.advanced.seo)?)
        .bind(serde_json::to_string(&store.advanced.language)?)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&mut *tx)
        .await;

        match inserted.map_err(DbError::from) {
            Ok(_) => {}
            Err(DbError::UniqueViolation { field, .. }) if field == "subdomain" => {
                return Err(CoreError::SubdomainTaken(store.subdomain).into());
            }
            Err(DbError::UniqueViolation { field, .. }) if field == "owner_id" => {
                return Err(CoreError::OwnerAlreadyHasStore(store.owner_id).into());
            }
            Err(e) => return Err(e),
        }

        for page in &pages {
            insert_page(&mut tx, page).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(store)
    }

    /// Renames the store.
    pub async fn update_profile(&self, id: &str, store_name: &str) -> DbResult<()> {
        let store_name = store_name.trim();
        validate_store_name(store_name)?;

        debug!(store_id = %id, "Updating store profile");

        let result = sqlx::query("UPDATE stores SET store_name = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(store_name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }
        Ok(())
    }

    pub async fn update_location(&self, id: &str, location: &StoreLocation) -> DbResult<()> {
        debug!(store_id = %id, "Updating store location");

        let result = sqlx::query(
            r#"
            UPDATE stores SET
                address = ?2, city = ?3, country = ?4, lat = ?5, lng = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(location.address.trim())
        .bind(location.city.trim())
        .bind(location.country.trim())
        .bind(location.lat)
        .bind(location.lng)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }
        Ok(())
    }

    /// Replaces the stored shipping document with a complete configuration.
    pub async fn update_shipping(&self, id: &str, config: &ShippingConfig) -> DbResult<()> {
        config.validate()?;
        self.update_settings_column(id, "shipping_config", serde_json::to_string(config)?)
            .await
    }

    pub async fn update_seo(&self, id: &str, seo: &SeoConfig) -> DbResult<()> {
        seo.validate()?;
        self.update_settings_column(id, "seo_config", serde_json::to_string(seo)?)
            .await
    }

    pub async fn update_language(&self, id: &str, language: &LanguageSettings) -> DbResult<()> {
        language.validate()?;
        self.update_settings_column(id, "language_settings", serde_json::to_string(language)?)
            .await
    }

    /// `column` is always one of the fixed settings columns above.
    async fn update_settings_column(&self, id: &str, column: &str, json: String) -> DbResult<()> {
        debug!(store_id = %id, column = %column, "Updating store settings");

        let sql = format!(
            "UPDATE stores SET {} = ?2, updated_at = ?3 WHERE id = ?1",
            column
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(json)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup;
    use vitrina_core::shipping::{merge_shipping_config, DeliveryMode, ShippingUpdate};
    use vitrina_core::{Language, PageKind, ValidationError};

    fn new_store(owner: &str, subdomain: &str) -> NewStore {
        NewStore {
            owner_id: owner.to_string(),
            store_name: "Otra Tienda".to_string(),
            subdomain: subdomain.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_store_with_default_pages() {
        let (db, store) = setup().await;

        let loaded = db.stores().get(&store.id).await.unwrap().unwrap();
        assert_eq!(loaded.subdomain, "bodega-rosa");
        assert!(loaded.advanced.shipping.is_none());

        let pages = db.tenant(&store.id).pages().list().await.unwrap();
        let kinds: Vec<PageKind> = pages.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, PageKind::DEFAULTS.to_vec());
    }

    #[tokio::test]
    async fn test_subdomain_availability() {
        let (db, _) = setup().await;
        let stores = db.stores();

        assert!(!stores.check_subdomain_availability("www").await.unwrap());
        assert!(!stores.check_subdomain_availability("my--shop").await.unwrap());
        assert!(!stores.check_subdomain_availability("bodega-rosa").await.unwrap());
        assert!(stores.check_subdomain_availability("otra-tienda").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_store_guards() {
        let (db, _) = setup().await;
        let stores = db.stores();

        assert!(matches!(
            stores.create_store(new_store("owner-2", "bodega-rosa")).await,
            Err(DbError::Domain(CoreError::SubdomainTaken(_)))
        ));
        assert!(matches!(
            stores.create_store(new_store("owner-1", "otra-tienda")).await,
            Err(DbError::Domain(CoreError::OwnerAlreadyHasStore(_)))
        ));
        assert!(matches!(
            stores.create_store(new_store("owner-2", "www")).await,
            Err(DbError::Domain(CoreError::Validation(ValidationError::Reserved { .. })))
        ));

        // nothing half-written by the rejected attempts
        assert!(stores.get_by_owner("owner-2").await.unwrap().is_none());
        assert!(stores.create_store(new_store("owner-2", "otra-tienda")).await.is_ok());
    }

    #[tokio::test]
    async fn test_shipping_round_trip() {
        let (db, store) = setup().await;
        let stores = db.stores();

        let mut config = merge_shipping_config(None);
        config.apply(ShippingUpdate::SetMode {
            mode: DeliveryMode::LocalDelivery,
            enabled: true,
        });
        config.apply(ShippingUpdate::SetLocalBaseCost(650));
        stores.update_shipping(&store.id, &config).await.unwrap();

        let loaded = stores.get(&store.id).await.unwrap().unwrap();
        let merged = merge_shipping_config(loaded.advanced.shipping.as_ref());
        assert_eq!(merged, config);
    }

    #[tokio::test]
    async fn test_invalid_shipping_is_not_written() {
        let (db, store) = setup().await;
        let stores = db.stores();

        let mut config = merge_shipping_config(None);
        config.apply(ShippingUpdate::SetLocalBaseCost(-5));
        assert!(stores.update_shipping(&store.id, &config).await.is_err());

        let loaded = stores.get(&store.id).await.unwrap().unwrap();
        assert!(loaded.advanced.shipping.is_none());
    }

    #[tokio::test]
    async fn test_settings_updates() {
        let (db, store) = setup().await;
        let stores = db.stores();

        stores.update_profile(&store.id, "  Bodega Rosa SAC ").await.unwrap();
        stores
            .update_location(
                &store.id,
                &StoreLocation {
                    address: "Av. X 123".into(),
                    city: "Lima".into(),
                    country: "PE".into(),
                    lat: Some(-12.05),
                    lng: Some(-77.04),
                },
            )
            .await
            .unwrap();
        stores
            .update_seo(
                &store.id,
                &SeoConfig {
                    meta_title: "Bodega Rosa".into(),
                    keywords: vec!["flores".into()],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        stores
            .update_language(
                &store.id,
                &LanguageSettings {
                    default_language: Language::En,
                    enabled: vec![Language::Es, Language::En],
                },
            )
            .await
            .unwrap();

        let loaded = stores.get(&store.id).await.unwrap().unwrap();
        assert_eq!(loaded.store_name, "Bodega Rosa SAC");
        assert_eq!(loaded.location.address, "Av. X 123");
        assert_eq!(loaded.advanced.seo.keywords, vec!["flores".to_string()]);
        assert_eq!(loaded.advanced.language.default_language, Language::En);

        let bad_language = LanguageSettings {
            default_language: Language::En,
            enabled: vec![Language::Es],
        };
        assert!(stores.update_language(&store.id, &bad_language).await.is_err());
        assert!(matches!(
            stores.update_profile("missing", "Nombre").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
