//! # Delivery Zone Commands
//!
//! The zone map editor. Zones price local delivery; see
//! [`super::shipping::quote_delivery`].

use tracing::{debug, info};

use vitrina_core::{DeliveryZone, DeliveryZoneInput};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_zones(app: &AppState, store_id: &str) -> ApiResult<Vec<DeliveryZone>> {
    let zones = app.db.tenant(store_id).delivery_zones().list().await?;
    debug!(store_id = %store_id, count = zones.len(), "list_zones command");
    Ok(zones)
}

pub async fn create_zone(
    app: &AppState,
    store_id: &str,
    input: DeliveryZoneInput,
) -> ApiResult<DeliveryZone> {
    let zone = app.db.tenant(store_id).delivery_zones().create(input).await?;
    info!(store_id = %store_id, id = %zone.id, name = %zone.name, "create_zone command");
    Ok(zone)
}

pub async fn update_zone(
    app: &AppState,
    store_id: &str,
    id: &str,
    input: DeliveryZoneInput,
) -> ApiResult<DeliveryZone> {
    let zone = app
        .db
        .tenant(store_id)
        .delivery_zones()
        .update(id, input)
        .await?;
    debug!(store_id = %store_id, id = %id, "update_zone command");
    Ok(zone)
}

/// Pauses or resumes a zone without losing its outline.
pub async fn set_zone_active(
    app: &AppState,
    store_id: &str,
    id: &str,
    is_active: bool,
) -> ApiResult<()> {
    app.db
        .tenant(store_id)
        .delivery_zones()
        .set_active(id, is_active)
        .await?;
    Ok(())
}

pub async fn delete_zone(app: &AppState, store_id: &str, id: &str) -> ApiResult<()> {
    app.db.tenant(store_id).delivery_zones().delete(id).await?;
    info!(store_id = %store_id, id = %id, "delete_zone command");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::app_with_store;
    use crate::error::ErrorCode;
    use vitrina_core::zone::LatLng;
    use vitrina_core::ZoneShape;

    fn triangle() -> DeliveryZoneInput {
        DeliveryZoneInput {
            name: "Centro".into(),
            shape: ZoneShape::Polygon {
                vertices: vec![
                    LatLng::new(-12.10, -77.05),
                    LatLng::new(-12.10, -77.00),
                    LatLng::new(-12.15, -77.02),
                ],
            },
            price_cents: 700,
            color: "#3B82F6".into(),
            estimated_time: "45 min".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_zone_lifecycle() {
        let (app, store) = app_with_store().await;

        let zone = create_zone(&app, &store.id, triangle()).await.unwrap();
        assert_eq!(zone.color, "#3b82f6");

        let zone = update_zone(
            &app,
            &store.id,
            &zone.id,
            DeliveryZoneInput {
                price_cents: 900,
                ..triangle()
            },
        )
        .await
        .unwrap();
        assert_eq!(zone.price_cents, 900);

        set_zone_active(&app, &store.id, &zone.id, false).await.unwrap();
        let zones = list_zones(&app, &store.id).await.unwrap();
        assert_eq!(zones.len(), 1);
        assert!(!zones[0].is_active);

        delete_zone(&app, &store.id, &zone.id).await.unwrap();
        let err = delete_zone(&app, &store.id, &zone.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_degenerate_polygon_is_rejected() {
        let (app, store) = app_with_store().await;

        let err = create_zone(
            &app,
            &store.id,
            DeliveryZoneInput {
                shape: ZoneShape::Polygon {
                    vertices: vec![LatLng::new(-12.1, -77.0), LatLng::new(-12.2, -77.0)],
                },
                ..triangle()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(list_zones(&app, &store.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zones_are_per_store() {
        let (app, store) = app_with_store().await;
        let zone = create_zone(&app, &store.id, triangle()).await.unwrap();

        assert!(list_zones(&app, "other-store").await.unwrap().is_empty());
        let err = delete_zone(&app, "other-store", &zone.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
