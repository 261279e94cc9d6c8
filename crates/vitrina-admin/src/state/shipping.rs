//! # Shipping Form State
//!
//! The shipping settings page of one store.
//!
//! ```text
//!  store.advanced.shipping (partial, maybe old schema)
//!         │
//!         ▼  merge_shipping_config
//!  saved: ShippingConfig  ──clone──►  draft: ShippingConfig
//!                                        │  autofill pickup address (first load only)
//!                                        │  apply(ShippingUpdate) ...
//!                                        ▼
//!                                  validate ──► update_shipping ──► saved = draft
//! ```

use tracing::{debug, info};

use vitrina_core::shipping::{autofill_pickup_address, merge_shipping_config};
use vitrina_core::{ShippingConfig, ShippingUpdate, Store};
use vitrina_db::StoreRepository;

use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct ShippingFormState {
    store_id: String,
    saved: ShippingConfig,
    draft: ShippingConfig,
    pickup_autofilled: bool,
}

impl ShippingFormState {
    /// Builds the form from a store document.
    pub fn from_store(store: &Store) -> Self {
        let stored = store.advanced.shipping.as_ref();
        let saved = merge_shipping_config(stored);

        let mut draft = saved.clone();
        let pickup_autofilled = autofill_pickup_address(&mut draft, &store.location, stored.is_some());

        debug!(
            store_id = %store.id,
            had_stored = stored.is_some(),
            pickup_autofilled,
            "Shipping form loaded"
        );

        ShippingFormState {
            store_id: store.id.clone(),
            saved,
            draft,
            pickup_autofilled,
        }
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// The configuration as currently edited.
    pub fn config(&self) -> &ShippingConfig {
        &self.draft
    }

    pub fn pickup_autofilled(&self) -> bool {
        self.pickup_autofilled
    }

    /// True when the form differs from what is stored.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.saved
    }

    pub fn apply(&mut self, update: ShippingUpdate) {
        self.draft.apply(update);
    }

    /// Discards unsaved edits.
    pub fn reset(&mut self) {
        self.draft = self.saved.clone();
    }

    /// Validates and writes the draft. Nothing is written when validation
    /// fails.
    pub async fn save(&mut self, stores: &StoreRepository) -> ApiResult<()> {
        self.draft.validate()?;
        stores.update_shipping(&self.store_id, &self.draft).await?;

        info!(store_id = %self.store_id, "Shipping configuration saved");
        self.saved = self.draft.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrina_core::shipping::DeliveryMode;
    use vitrina_core::{NewStore, StoreLocation};
    use vitrina_db::{Database, DbConfig};

    async fn store_with_address(address: &str) -> (Database, Store) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db
            .stores()
            .create_store(NewStore {
                owner_id: "owner-1".into(),
                store_name: "Bodega Rosa".into(),
                subdomain: "bodega-rosa".into(),
                location: StoreLocation {
                    address: address.into(),
                    ..Default::default()
                },
                ..Default::default()
            })
            .await
            .unwrap();
        (db, store)
    }

    #[tokio::test]
    async fn test_first_load_autofills_pickup() {
        let (_db, store) = store_with_address("Av. X 123").await;
        let form = ShippingFormState::from_store(&store);

        assert!(form.pickup_autofilled());
        assert_eq!(form.config().store_pickup.address, "Av. X 123");
        assert!(form.is_dirty());
    }

    #[tokio::test]
    async fn test_save_round_trip_disables_autofill() {
        let (db, store) = store_with_address("Av. X 123").await;
        let mut form = ShippingFormState::from_store(&store);

        form.apply(ShippingUpdate::SetMode {
            mode: DeliveryMode::LocalDelivery,
            enabled: true,
        });
        form.apply(ShippingUpdate::SetLocalBaseCost(700));
        form.save(&db.stores()).await.unwrap();
        assert!(!form.is_dirty());

        let reloaded = db.stores().get(&store.id).await.unwrap().unwrap();
        let form = ShippingFormState::from_store(&reloaded);
        assert!(!form.pickup_autofilled());
        assert!(form.config().modes.local_delivery);
        assert_eq!(form.config().local_delivery.base_cost_cents, 700);
        assert_eq!(form.config().store_pickup.address, "Av. X 123");
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_saved() {
        let (db, store) = store_with_address("").await;
        let mut form = ShippingFormState::from_store(&store);
        assert!(!form.pickup_autofilled());

        form.apply(ShippingUpdate::SetLocalBaseCost(-5));
        assert!(form.save(&db.stores()).await.is_err());
        assert!(form.is_dirty());

        let reloaded = db.stores().get(&store.id).await.unwrap().unwrap();
        assert!(reloaded.advanced.shipping.is_none());

        form.reset();
        assert!(!form.is_dirty());
    }
}
