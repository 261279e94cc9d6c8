//! # Delivery Zone Repository
//!
//! Map-drawn delivery zones of one store. The `delivery_zones` table is the
//! only place zones live; the shape (polygon or circle) is a JSON column.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use vitrina_core::{DeliveryZone, DeliveryZoneInput, ZoneShape};

use super::generate_id;
use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, sqlx::FromRow)]
struct DeliveryZoneRecord {
    id: String,
    store_id: String,
    name: String,
    shape: String,
    price_cents: i64,
    color: String,
    estimated_time: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DeliveryZoneRecord> for DeliveryZone {
    type Error = DbError;

    fn try_from(r: DeliveryZoneRecord) -> DbResult<Self> {
        let shape: ZoneShape = serde_json::from_str(&r.shape)?;
        Ok(DeliveryZone {
            id: r.id,
            store_id: r.store_id,
            name: r.name,
            shape,
            price_cents: r.price_cents,
            color: r.color,
            estimated_time: r.estimated_time,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const ZONE_COLUMNS: &str = r#"
    id, store_id, name, shape, price_cents, color, estimated_time, is_active,
    created_at, updated_at
"#;

/// Repository for one store's delivery zones.
#[derive(Debug, Clone)]
pub struct DeliveryZoneRepository {
    pool: SqlitePool,
    store_id: String,
}

impl DeliveryZoneRepository {
    pub fn new(pool: SqlitePool, store_id: String) -> Self {
        DeliveryZoneRepository { pool, store_id }
    }

    pub async fn list(&self) -> DbResult<Vec<DeliveryZone>> {
        let sql = format!(
            "SELECT {} FROM delivery_zones WHERE store_id = ?1 ORDER BY created_at, id",
            ZONE_COLUMNS
        );
        sqlx::query_as::<_, DeliveryZoneRecord>(&sql)
            .bind(&self.store_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(DeliveryZone::try_from)
            .collect()
    }

    /// Active zones only, the set used to price a delivery.
    pub async fn list_active(&self) -> DbResult<Vec<DeliveryZone>> {
        Ok(self.list().await?.into_iter().filter(|z| z.is_active).collect())
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<DeliveryZone>> {
        let sql = format!(
            "SELECT {} FROM delivery_zones WHERE id = ?1 AND store_id = ?2",
            ZONE_COLUMNS
        );
        sqlx::query_as::<_, DeliveryZoneRecord>(&sql)
            .bind(id)
            .bind(&self.store_id)
            .fetch_optional(&self.pool)
            .await?
            .map(DeliveryZone::try_from)
            .transpose()
    }

    pub async fn create(&self, input: DeliveryZoneInput) -> DbResult<DeliveryZone> {
        input.validate()?;

        let now = Utc::now();
        let zone = DeliveryZone {
            id: generate_id(),
            store_id: self.store_id.clone(),
            name: input.name.trim().to_string(),
            shape: input.shape,
            price_cents: input.price_cents,
            color: input.color.to_lowercase(),
            estimated_time: input.estimated_time.trim().to_string(),
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };

        debug!(store_id = %self.store_id, name = %zone.name, price_cents = zone.price_cents, "Creating delivery zone");

        sqlx::query(
            r#"
            INSERT INTO delivery_zones (
                id, store_id, name, shape, price_cents, color, estimated_time, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&zone.id)
        .bind(&zone.store_id)
        .bind(&zone.name)
        .bind(serde_json::to_string(&zone.shape)?)
        .bind(zone.price_cents)
        .bind(&zone.color)
        .bind(&zone.estimated_time)
        .bind(zone.is_active)
        .bind(zone.created_at)
        .bind(zone.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(zone)
    }

    /// Replaces a zone's name, outline, price and display fields.
    pub async fn update(&self, id: &str, input: DeliveryZoneInput) -> DbResult<DeliveryZone> {
        input.validate()?;
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("DeliveryZone", id))?;

        let zone = DeliveryZone {
            name: input.name.trim().to_string(),
            shape: input.shape,
            price_cents: input.price_cents,
            color: input.color.to_lowercase(),
            estimated_time: input.estimated_time.trim().to_string(),
            is_active: input.is_active,
            updated_at: Utc::now(),
            ..existing
        };

        debug!(store_id = %self.store_id, id = %id, "Updating delivery zone");

        let result = sqlx::query(
            r#"
            UPDATE delivery_zones SET
                name = ?3, shape = ?4, price_cents = ?5, color = ?6,
                estimated_time = ?7, is_active = ?8, updated_at = ?9
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(id)
        .bind(&self.store_id)
        .bind(&zone.name)
        .bind(serde_json::to_string(&zone.shape)?)
        .bind(zone.price_cents)
        .bind(&zone.color)
        .bind(&zone.estimated_time)
        .bind(zone.is_active)
        .bind(zone.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DeliveryZone", id));
        }
        Ok(zone)
    }

    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        debug!(store_id = %self.store_id, id = %id, is_active, "Toggling delivery zone");

        let result = sqlx::query(
            "UPDATE delivery_zones SET is_active = ?3, updated_at = ?4 WHERE id = ?1 AND store_id = ?2",
        )
        .bind(id)
        .bind(&self.store_id)
        .bind(is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DeliveryZone", id));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        info!(store_id = %self.store_id, id = %id, "Deleting delivery zone");

        let result = sqlx::query("DELETE FROM delivery_zones WHERE id = ?1 AND store_id = ?2")
            .bind(id)
            .bind(&self.store_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DeliveryZone", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup;
    use vitrina_core::zone::{find_zone, LatLng};
    use vitrina_core::{CoreError, ValidationError};

    fn circle(name: &str, price_cents: i64, radius_m: f64) -> DeliveryZoneInput {
        DeliveryZoneInput {
            name: name.to_string(),
            shape: ZoneShape::Circle {
                center: LatLng::new(-12.05, -77.05),
                radius_m,
            },
            price_cents,
            color: "#22C55E".to_string(),
            estimated_time: "30-45 min".to_string(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_zone_round_trip() {
        let (db, store) = setup().await;
        let zones = db.tenant(&store.id).delivery_zones();

        let created = zones.create(circle("Centro", 500, 2_000.0)).await.unwrap();
        assert_eq!(created.color, "#22c55e");

        let loaded = zones.get(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn test_inactive_zones_do_not_price() {
        let (db, store) = setup().await;
        let zones = db.tenant(&store.id).delivery_zones();

        let near = zones.create(circle("Cerca", 500, 2_000.0)).await.unwrap();
        let far = zones.create(circle("Lejos", 900, 8_000.0)).await.unwrap();

        let active = zones.list_active().await.unwrap();
        assert_eq!(find_zone(&active, -12.05, -77.05).map(|z| z.id.as_str()), Some(near.id.as_str()));

        zones.set_active(&near.id, false).await.unwrap();
        let active = zones.list_active().await.unwrap();
        assert_eq!(find_zone(&active, -12.05, -77.05).map(|z| z.id.as_str()), Some(far.id.as_str()));
        assert_eq!(zones.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_zone_is_rejected() {
        let (db, store) = setup().await;
        let zones = db.tenant(&store.id).delivery_zones();

        assert!(matches!(
            zones.create(circle("Centro", 500, 0.0)).await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));
        assert!(matches!(
            zones
                .create(DeliveryZoneInput {
                    color: "verde".into(),
                    ..circle("Centro", 500, 100.0)
                })
                .await,
            Err(DbError::Domain(CoreError::Validation(ValidationError::InvalidFormat { .. })))
        ));
        assert!(zones.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (db, store) = setup().await;
        let zones = db.tenant(&store.id).delivery_zones();
        let zone = zones.create(circle("Centro", 500, 2_000.0)).await.unwrap();

        let updated = zones
            .update(&zone.id, circle("Centro ampliado", 650, 3_000.0))
            .await
            .unwrap();
        assert_eq!(updated.created_at, zone.created_at);
        assert_eq!(updated.price_cents, 650);

        zones.delete(&zone.id).await.unwrap();
        assert!(matches!(
            zones.delete(&zone.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
