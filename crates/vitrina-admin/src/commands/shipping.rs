//! # Shipping Commands
//!
//! The shipping settings form and delivery quotes.
//!
//! ## Quote Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quote_delivery(subtotal, mode, lat?, lng?)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  merge stored shipping config                                           │
//! │       │                                                                 │
//! │  mode enabled? ── no ──► ShippingModeDisabled                           │
//! │       │                                                                 │
//! │       ├─ localDelivery + coordinates ──► cheapest active zone           │
//! │       │                                   containing the point          │
//! │       │                                   (none? ──► out of area)       │
//! │       │                                   (no zones? ──► max distance   │
//! │       │                                    from the store)              │
//! │       ▼                                                                 │
//! │  free shipping? ─► zone price or section base cost                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use vitrina_core::shipping::{merge_shipping_config, DeliveryMode};
use vitrina_core::validation::validate_price_cents;
use vitrina_core::zone::{find_zone, LatLng};
use vitrina_core::{CoreError, Money, ShippingConfig, ShippingUpdate};

use super::store::load_store;
use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, ShippingFormState};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFormDto {
    pub store_id: String,
    pub config: ShippingConfig,
    /// The pickup address was copied from the store address on this load.
    pub pickup_autofilled: bool,
    pub dirty: bool,
}

impl From<&ShippingFormState> for ShippingFormDto {
    fn from(form: &ShippingFormState) -> Self {
        ShippingFormDto {
            store_id: form.store_id().to_string(),
            config: form.config().clone(),
            pickup_autofilled: form.pickup_autofilled(),
            dirty: form.is_dirty(),
        }
    }
}

fn not_loaded() -> ApiError {
    ApiError::business("The shipping form is not loaded")
}

/// Opens the shipping form, discarding unsaved edits of a previous load.
pub async fn load_shipping_form(app: &AppState, store_id: &str) -> ApiResult<ShippingFormDto> {
    let store = load_store(app, store_id).await?;
    let form = ShippingFormState::from_store(&store);
    let dto = ShippingFormDto::from(&form);

    *app.shipping.lock().await = Some(form);
    Ok(dto)
}

/// Applies form edits in order. Nothing is stored until `save_shipping_form`.
pub async fn edit_shipping_form(
    app: &AppState,
    updates: Vec<ShippingUpdate>,
) -> ApiResult<ShippingFormDto> {
    let mut guard = app.shipping.lock().await;
    let form = guard.as_mut().ok_or_else(not_loaded)?;

    debug!(store_id = %form.store_id(), count = updates.len(), "edit_shipping_form command");
    for update in updates {
        form.apply(update);
    }
    Ok(ShippingFormDto::from(&*form))
}

pub async fn reset_shipping_form(app: &AppState) -> ApiResult<ShippingFormDto> {
    let mut guard = app.shipping.lock().await;
    let form = guard.as_mut().ok_or_else(not_loaded)?;
    form.reset();
    Ok(ShippingFormDto::from(&*form))
}

pub async fn save_shipping_form(app: &AppState) -> ApiResult<ShippingFormDto> {
    let mut guard = app.shipping.lock().await;
    let form = guard.as_mut().ok_or_else(not_loaded)?;

    form.save(&app.db.inner().stores()).await?;
    Ok(ShippingFormDto::from(&*form))
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub subtotal_cents: i64,
    pub mode: DeliveryMode,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryQuote {
    pub mode: DeliveryMode,
    pub cost_cents: i64,
    pub free_shipping: bool,
    pub zone_id: Option<String>,
    pub zone_name: Option<String>,
    pub estimated_time: String,
}

/// Prices the delivery of an order using the store's saved configuration.
pub async fn quote_delivery(
    app: &AppState,
    store_id: &str,
    request: QuoteRequest,
) -> ApiResult<DeliveryQuote> {
    validate_price_cents("subtotal", request.subtotal_cents)?;

    let store = load_store(app, store_id).await?;
    let config = merge_shipping_config(store.advanced.shipping.as_ref());
    let subtotal = Money::from_cents(request.subtotal_cents);

    if !config.modes.is_enabled(request.mode) {
        return Err(CoreError::ShippingModeDisabled(request.mode.to_string()).into());
    }

    let mut zone = None;
    if let (DeliveryMode::LocalDelivery, Some(lat), Some(lng)) =
        (request.mode, request.lat, request.lng)
    {
        let zones = app.db.tenant(store_id).delivery_zones().list_active().await?;
        zone = find_zone(&zones, lat, lng).cloned();

        if zone.is_none() {
            if !zones.is_empty() {
                return Err(ApiError::business(
                    "The delivery address is outside every delivery zone",
                ));
            }
            if let (Some(store_lat), Some(store_lng)) = (store.location.lat, store.location.lng) {
                let origin = LatLng::new(store_lat, store_lng);
                if !config.local_delivery.within_range(&origin, &LatLng::new(lat, lng)) {
                    return Err(ApiError::business(format!(
                        "The delivery address is more than {} km from the store",
                        config.local_delivery.max_distance_km
                    )));
                }
            }
        }
    }

    let cost = match &zone {
        Some(z) => config.quote_with_base(subtotal, request.mode, Money::from_cents(z.price_cents))?,
        None => config.quote(subtotal, request.mode)?,
    };

    let estimated_time = match (&zone, request.mode) {
        (Some(z), _) if !z.estimated_time.is_empty() => z.estimated_time.clone(),
        (_, DeliveryMode::StorePickup) => config.store_pickup.preparation_time.clone(),
        (_, DeliveryMode::LocalDelivery) => config.local_delivery.estimated_time.clone(),
        (_, DeliveryMode::NationalShipping) => config.national_shipping.estimated_days.clone(),
        (_, DeliveryMode::InternationalShipping) => {
            config.international_shipping.estimated_days.clone()
        }
    };

    debug!(
        store_id = %store_id,
        mode = %request.mode,
        cost_cents = cost.cents(),
        zone = ?zone.as_ref().map(|z| z.id.as_str()),
        "quote_delivery command"
    );

    Ok(DeliveryQuote {
        mode: request.mode,
        cost_cents: cost.cents(),
        free_shipping: config.free_shipping_applies(subtotal, request.mode),
        zone_id: zone.as_ref().map(|z| z.id.clone()),
        zone_name: zone.map(|z| z.name),
        estimated_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::app_with_store;
    use crate::error::ErrorCode;
    use vitrina_core::zone::LatLng;
    use vitrina_core::{DeliveryZoneInput, ZoneShape};

    fn local_on() -> Vec<ShippingUpdate> {
        vec![
            ShippingUpdate::SetMode {
                mode: DeliveryMode::LocalDelivery,
                enabled: true,
            },
            ShippingUpdate::SetLocalBaseCost(800),
        ]
    }

    fn request(subtotal_cents: i64, lat: Option<f64>, lng: Option<f64>) -> QuoteRequest {
        QuoteRequest {
            subtotal_cents,
            mode: DeliveryMode::LocalDelivery,
            lat,
            lng,
        }
    }

    #[tokio::test]
    async fn test_form_requires_load() {
        let (app, _store) = app_with_store().await;
        assert!(edit_shipping_form(&app, local_on()).await.is_err());
        assert!(save_shipping_form(&app).await.is_err());
    }

    #[tokio::test]
    async fn test_edit_and_save() {
        let (app, store) = app_with_store().await;

        let dto = load_shipping_form(&app, &store.id).await.unwrap();
        assert!(dto.pickup_autofilled);
        assert_eq!(dto.config.store_pickup.address, "Av. Larco 345");

        let dto = edit_shipping_form(&app, local_on()).await.unwrap();
        assert!(dto.dirty);
        let dto = save_shipping_form(&app).await.unwrap();
        assert!(!dto.dirty);

        let dto = load_shipping_form(&app, &store.id).await.unwrap();
        assert!(!dto.pickup_autofilled);
        assert!(dto.config.modes.local_delivery);
    }

    #[tokio::test]
    async fn test_quote_disabled_mode() {
        let (app, store) = app_with_store().await;
        let err = quote_delivery(&app, &store.id, request(5_000, None, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_quote_without_zones_respects_max_distance() {
        let (app, store) = app_with_store().await;
        load_shipping_form(&app, &store.id).await.unwrap();
        edit_shipping_form(&app, local_on()).await.unwrap();
        save_shipping_form(&app).await.unwrap();

        // about 1 km from the store, inside the default 10 km
        let quote = quote_delivery(&app, &store.id, request(5_000, Some(-12.1300), Some(-77.0250)))
            .await
            .unwrap();
        assert_eq!(quote.cost_cents, 800);
        assert_eq!(quote.zone_id, None);

        let err = quote_delivery(&app, &store.id, request(5_000, Some(-12.5), Some(-76.5)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        load_shipping_form(&app, &store.id).await.unwrap();
        edit_shipping_form(&app, vec![ShippingUpdate::SetLocalMaxDistance(0.0)])
            .await
            .unwrap();
        save_shipping_form(&app).await.unwrap();
        let quote = quote_delivery(&app, &store.id, request(5_000, Some(-12.5), Some(-76.5)))
            .await
            .unwrap();
        assert_eq!(quote.cost_cents, 800);
    }

    #[tokio::test]
    async fn test_quote_uses_zone_price_and_free_shipping() {
        let (app, store) = app_with_store().await;
        load_shipping_form(&app, &store.id).await.unwrap();
        let mut updates = local_on();
        updates.push(ShippingUpdate::SetFreeShipping(true));
        updates.push(ShippingUpdate::SetFreeShippingMinimum(10_000));
        edit_shipping_form(&app, updates).await.unwrap();
        save_shipping_form(&app).await.unwrap();

        let zone = app
            .db
            .tenant(&store.id)
            .delivery_zones()
            .create(DeliveryZoneInput {
                name: "Miraflores".into(),
                shape: ZoneShape::Circle {
                    center: LatLng::new(-12.1211, -77.0297),
                    radius_m: 2_000.0,
                },
                price_cents: 500,
                color: "#22c55e".into(),
                estimated_time: "30-45 min".into(),
                is_active: true,
            })
            .await
            .unwrap();

        let quote = quote_delivery(&app, &store.id, request(5_000, Some(-12.1215), Some(-77.03)))
            .await
            .unwrap();
        assert_eq!(quote.cost_cents, 500);
        assert_eq!(quote.zone_id.as_deref(), Some(zone.id.as_str()));
        assert_eq!(quote.estimated_time, "30-45 min");

        let quote = quote_delivery(&app, &store.id, request(12_000, Some(-12.1215), Some(-77.03)))
            .await
            .unwrap();
        assert_eq!(quote.cost_cents, 0);
        assert!(quote.free_shipping);

        // no coordinates: section base cost
        let quote = quote_delivery(&app, &store.id, request(5_000, None, None))
            .await
            .unwrap();
        assert_eq!(quote.cost_cents, 800);

        let err = quote_delivery(&app, &store.id, request(5_000, Some(-12.5), Some(-76.5)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }
}
