//! # Store Commands
//!
//! Tenant bootstrap ("create your store") and the store-level settings pages.

use tracing::{debug, info};

use vitrina_core::{LanguageSettings, NewStore, SeoConfig, Store, StoreLocation};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub(crate) async fn load_store(app: &AppState, store_id: &str) -> ApiResult<Store> {
    app.db
        .inner()
        .stores()
        .get(store_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Store", store_id))
}

/// Live check while the owner types a subdomain.
///
/// `false` for invalid or reserved names as well as taken ones. The answer
/// can be stale by the time `create_store` runs; that call checks again.
pub async fn check_subdomain(app: &AppState, subdomain: &str) -> ApiResult<bool> {
    let available = app
        .db
        .inner()
        .stores()
        .check_subdomain_availability(subdomain)
        .await?;
    debug!(subdomain = %subdomain, available, "check_subdomain command");
    Ok(available)
}

/// Creates the owner's store together with its default pages.
///
/// A store created without explicit language settings starts with the
/// configured default language.
pub async fn create_store(app: &AppState, mut input: NewStore) -> ApiResult<Store> {
    if input.language == LanguageSettings::default() {
        let language = app.config.store.default_language;
        input.language = LanguageSettings {
            default_language: language,
            enabled: vec![language],
        };
    }

    let store = app.db.inner().stores().create_store(input).await?;
    info!(store_id = %store.id, subdomain = %store.subdomain, "create_store command");
    Ok(store)
}

/// The store of the signed-in owner, `None` before onboarding.
pub async fn get_my_store(app: &AppState, owner_id: &str) -> ApiResult<Option<Store>> {
    Ok(app.db.inner().stores().get_by_owner(owner_id).await?)
}

pub async fn update_store_profile(
    app: &AppState,
    store_id: &str,
    store_name: &str,
) -> ApiResult<Store> {
    app.db
        .inner()
        .stores()
        .update_profile(store_id, store_name)
        .await?;
    load_store(app, store_id).await
}

pub async fn update_store_location(
    app: &AppState,
    store_id: &str,
    location: StoreLocation,
) -> ApiResult<Store> {
    app.db
        .inner()
        .stores()
        .update_location(store_id, &location)
        .await?;
    load_store(app, store_id).await
}

pub async fn update_seo(app: &AppState, store_id: &str, seo: SeoConfig) -> ApiResult<Store> {
    app.db.inner().stores().update_seo(store_id, &seo).await?;
    load_store(app, store_id).await
}

pub async fn update_language(
    app: &AppState,
    store_id: &str,
    language: LanguageSettings,
) -> ApiResult<Store> {
    app.db
        .inner()
        .stores()
        .update_language(store_id, &language)
        .await?;
    load_store(app, store_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::app_with_store;
    use crate::error::ErrorCode;
    use vitrina_core::Language;
    use vitrina_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_subdomain_check() {
        let (app, _store) = app_with_store().await;

        assert!(!check_subdomain(&app, "www").await.unwrap());
        assert!(!check_subdomain(&app, "my--shop").await.unwrap());
        assert!(!check_subdomain(&app, "bodega-rosa").await.unwrap());
        assert!(check_subdomain(&app, "bodega-azul").await.unwrap());
    }

    #[tokio::test]
    async fn test_second_store_for_owner_is_a_conflict() {
        let (app, _store) = app_with_store().await;

        let err = create_store(
            &app,
            NewStore {
                owner_id: "owner-1".into(),
                store_name: "Otra".into(),
                subdomain: "otra-tienda".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_configured_default_language() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut config = crate::config::AdminConfig::default();
        config.store.default_language = Language::En;
        let app = AppState::new(config, db);

        let store = create_store(
            &app,
            NewStore {
                owner_id: "owner-2".into(),
                store_name: "Corner Shop".into(),
                subdomain: "corner-shop".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(store.advanced.language.default_language, Language::En);
        assert_eq!(store.advanced.language.enabled, vec![Language::En]);
    }

    #[tokio::test]
    async fn test_settings_updates() {
        let (app, store) = app_with_store().await;

        let updated = update_seo(
            &app,
            &store.id,
            SeoConfig {
                meta_title: "Bodega Rosa | Abarrotes".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.advanced.seo.meta_title, "Bodega Rosa | Abarrotes");

        let err = update_seo(
            &app,
            &store.id,
            SeoConfig {
                meta_title: "x".repeat(61),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let renamed = update_store_profile(&app, &store.id, "Bodega Rosa 2")
            .await
            .unwrap();
        assert_eq!(renamed.store_name, "Bodega Rosa 2");
        assert_eq!(
            get_my_store(&app, "owner-1").await.unwrap().map(|s| s.id),
            Some(store.id)
        );
    }
}
