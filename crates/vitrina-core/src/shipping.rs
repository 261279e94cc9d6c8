//! # Shipping Configuration
//!
//! The store's shipping rules and the merge that reconciles what is stored
//! with the current default shape.
//!
//! ## Stored vs Complete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stores.advanced (JSON)                                                 │
//! │  { "shipping": { "modes": { "localDelivery": true } } }                 │
//! │        │                                                                │
//! │        ▼  serde (unknown keys ignored, bad values → None)               │
//! │  StoredShippingConfig   every key Option<_>                             │
//! │        │                                                                │
//! │        ▼  merge_shipping_config                                         │
//! │  ShippingConfig::default() ◄── overlay present keys, section by section │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ShippingConfig         complete, typed, edited via ShippingUpdate      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sections are overlaid explicitly rather than through a generic JSON
//! merge: lists replace lists, scalars replace scalars and the nested
//! `additionalRules.specialHandling` groups are merged one level deeper.
//!
//! Delivery zones are not part of this document. They live in the store's
//! `delivery_zones` table; a legacy `localDelivery.zones` array found in a
//! stored blob is dropped on merge.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::StoreLocation;
use crate::validation::{validate_price_cents, ValidationResult};
use crate::zone::LatLng;
use crate::SHIPPING_SCHEMA_VERSION;

// =============================================================================
// Complete Configuration
// =============================================================================

/// How an order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryMode {
    StorePickup,
    LocalDelivery,
    NationalShipping,
    InternationalShipping,
}

impl DeliveryMode {
    pub const ALL: [DeliveryMode; 4] = [
        DeliveryMode::StorePickup,
        DeliveryMode::LocalDelivery,
        DeliveryMode::NationalShipping,
        DeliveryMode::InternationalShipping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::StorePickup => "storePickup",
            DeliveryMode::LocalDelivery => "localDelivery",
            DeliveryMode::NationalShipping => "nationalShipping",
            DeliveryMode::InternationalShipping => "internationalShipping",
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which delivery modes the store offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingModes {
    pub store_pickup: bool,
    pub local_delivery: bool,
    pub national_shipping: bool,
    pub international_shipping: bool,
}

impl Default for ShippingModes {
    fn default() -> Self {
        ShippingModes {
            store_pickup: true,
            local_delivery: false,
            national_shipping: false,
            international_shipping: false,
        }
    }
}

impl ShippingModes {
    pub fn is_enabled(&self, mode: DeliveryMode) -> bool {
        match mode {
            DeliveryMode::StorePickup => self.store_pickup,
            DeliveryMode::LocalDelivery => self.local_delivery,
            DeliveryMode::NationalShipping => self.national_shipping,
            DeliveryMode::InternationalShipping => self.international_shipping,
        }
    }

    pub fn set(&mut self, mode: DeliveryMode, enabled: bool) {
        match mode {
            DeliveryMode::StorePickup => self.store_pickup = enabled,
            DeliveryMode::LocalDelivery => self.local_delivery = enabled,
            DeliveryMode::NationalShipping => self.national_shipping = enabled,
            DeliveryMode::InternationalShipping => self.international_shipping = enabled,
        }
    }

    pub fn any_enabled(&self) -> bool {
        DeliveryMode::ALL.iter().any(|m| self.is_enabled(*m))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StorePickup {
    pub address: String,
    pub schedule: String,
    pub instructions: String,
    /// Free text such as "2 horas".
    pub preparation_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LocalDelivery {
    /// Charged when the address falls in no delivery zone.
    pub base_cost_cents: i64,
    pub estimated_time: String,
    /// `0.0` means no distance limit.
    pub max_distance_km: f64,
}

impl LocalDelivery {
    /// True when `to` lies within `max_distance_km` of `from`.
    pub fn within_range(&self, from: &LatLng, to: &LatLng) -> bool {
        self.max_distance_km <= 0.0 || from.distance_m(to) <= self.max_distance_km * 1000.0
    }
}

impl Default for LocalDelivery {
    fn default() -> Self {
        LocalDelivery {
            base_cost_cents: 0,
            estimated_time: "24-48 horas".to_string(),
            max_distance_km: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NationalShipping {
    pub base_cost_cents: i64,
    pub cost_per_kg_cents: i64,
    pub estimated_days: String,
    /// Regions served, e.g. provinces.
    pub zones: Vec<String>,
    pub carriers: Vec<String>,
}

impl Default for NationalShipping {
    fn default() -> Self {
        NationalShipping {
            base_cost_cents: 0,
            cost_per_kg_cents: 0,
            estimated_days: "3-5".to_string(),
            zones: Vec::new(),
            carriers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InternationalShipping {
    pub base_cost_cents: i64,
    pub cost_per_kg_cents: i64,
    pub estimated_days: String,
    pub countries: Vec<String>,
}

impl Default for InternationalShipping {
    fn default() -> Self {
        InternationalShipping {
            base_cost_cents: 0,
            cost_per_kg_cents: 0,
            estimated_days: "7-15".to_string(),
            countries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FreeShipping {
    pub enabled: bool,
    /// Order subtotal from which shipping is free.
    pub minimum_cents: i64,
    pub applies_to: Vec<DeliveryMode>,
}

impl Default for FreeShipping {
    fn default() -> Self {
        FreeShipping {
            enabled: false,
            minimum_cents: 0,
            applies_to: vec![DeliveryMode::LocalDelivery, DeliveryMode::NationalShipping],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingNotifications {
    pub email_on_order: bool,
    pub email_on_dispatch: bool,
    pub whatsapp_updates: bool,
    pub tracking_link: bool,
}

impl Default for ShippingNotifications {
    fn default() -> Self {
        ShippingNotifications {
            email_on_order: true,
            email_on_dispatch: true,
            whatsapp_updates: false,
            tracking_link: false,
        }
    }
}

/// Checkout fields the customer must fill in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub require_phone: bool,
    pub require_address_reference: bool,
    pub require_document_id: bool,
    pub allow_delivery_notes: bool,
}

impl Default for CustomerInfo {
    fn default() -> Self {
        CustomerInfo {
            require_phone: true,
            require_address_reference: false,
            require_document_id: false,
            allow_delivery_notes: true,
        }
    }
}

/// Surcharge rule for one kind of special handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HandlingRule {
    pub enabled: bool,
    pub surcharge_cents: i64,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum HandlingKind {
    Fragile,
    Perishable,
    Oversized,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SpecialHandling {
    pub fragile: HandlingRule,
    pub perishable: HandlingRule,
    pub oversized: HandlingRule,
}

impl SpecialHandling {
    pub fn rule(&self, kind: HandlingKind) -> &HandlingRule {
        match kind {
            HandlingKind::Fragile => &self.fragile,
            HandlingKind::Perishable => &self.perishable,
            HandlingKind::Oversized => &self.oversized,
        }
    }

    pub fn rule_mut(&mut self, kind: HandlingKind) -> &mut HandlingRule {
        match kind {
            HandlingKind::Fragile => &mut self.fragile,
            HandlingKind::Perishable => &mut self.perishable,
            HandlingKind::Oversized => &mut self.oversized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalRules {
    pub special_handling: SpecialHandling,
    /// Business days between order and dispatch.
    pub handling_days: i64,
    pub restricted_items: Vec<String>,
}

impl Default for AdditionalRules {
    fn default() -> Self {
        AdditionalRules {
            special_handling: SpecialHandling::default(),
            handling_days: 1,
            restricted_items: Vec::new(),
        }
    }
}

/// The complete shipping configuration of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingConfig {
    pub version: u32,
    pub modes: ShippingModes,
    pub store_pickup: StorePickup,
    pub local_delivery: LocalDelivery,
    pub national_shipping: NationalShipping,
    pub international_shipping: InternationalShipping,
    pub free_shipping: FreeShipping,
    pub notifications: ShippingNotifications,
    pub customer_info: CustomerInfo,
    pub additional_rules: AdditionalRules,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        ShippingConfig {
            version: SHIPPING_SCHEMA_VERSION,
            modes: ShippingModes::default(),
            store_pickup: StorePickup::default(),
            local_delivery: LocalDelivery::default(),
            national_shipping: NationalShipping::default(),
            international_shipping: InternationalShipping::default(),
            free_shipping: FreeShipping::default(),
            notifications: ShippingNotifications::default(),
            customer_info: CustomerInfo::default(),
            additional_rules: AdditionalRules::default(),
        }
    }
}

// =============================================================================
// Stored (Partial) Configuration
// =============================================================================

/// Deserializes a field, turning a value of the wrong type into `None`.
///
/// Old dashboards wrote strings where numbers are expected today; a single
/// bad key must not make the whole document unreadable.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Declares the all-optional mirror of a flat section together with its
/// overlay onto the complete section and the conversion back.
macro_rules! stored_section {
    ($stored:ident => $full:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
        #[ts(export)]
        #[serde(rename_all = "camelCase")]
        pub struct $stored {
            $(
                #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $stored {
            fn overlay(&self, target: &mut $full) {
                $(
                    if let Some(value) = &self.$field {
                        target.$field = value.clone();
                    }
                )*
            }
        }

        impl From<&$full> for $stored {
            fn from(section: &$full) -> Self {
                $stored {
                    $( $field: Some(section.$field.clone()), )*
                }
            }
        }
    };
}

stored_section!(StoredShippingModes => ShippingModes {
    store_pickup: bool,
    local_delivery: bool,
    national_shipping: bool,
    international_shipping: bool,
});

stored_section!(StoredStorePickup => StorePickup {
    address: String,
    schedule: String,
    instructions: String,
    preparation_time: String,
});

stored_section!(StoredLocalDelivery => LocalDelivery {
    base_cost_cents: i64,
    estimated_time: String,
    max_distance_km: f64,
});

stored_section!(StoredNationalShipping => NationalShipping {
    base_cost_cents: i64,
    cost_per_kg_cents: i64,
    estimated_days: String,
    zones: Vec<String>,
    carriers: Vec<String>,
});

stored_section!(StoredInternationalShipping => InternationalShipping {
    base_cost_cents: i64,
    cost_per_kg_cents: i64,
    estimated_days: String,
    countries: Vec<String>,
});

stored_section!(StoredFreeShipping => FreeShipping {
    enabled: bool,
    minimum_cents: i64,
    applies_to: Vec<DeliveryMode>,
});

stored_section!(StoredNotifications => ShippingNotifications {
    email_on_order: bool,
    email_on_dispatch: bool,
    whatsapp_updates: bool,
    tracking_link: bool,
});

stored_section!(StoredCustomerInfo => CustomerInfo {
    require_phone: bool,
    require_address_reference: bool,
    require_document_id: bool,
    allow_delivery_notes: bool,
});

stored_section!(StoredHandlingRule => HandlingRule {
    enabled: bool,
    surcharge_cents: i64,
    notes: String,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoredSpecialHandling {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fragile: Option<StoredHandlingRule>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub perishable: Option<StoredHandlingRule>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub oversized: Option<StoredHandlingRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoredAdditionalRules {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub special_handling: Option<StoredSpecialHandling>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub handling_days: Option<i64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub restricted_items: Option<Vec<String>>,
}

/// The shipping document exactly as persisted: any key may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoredShippingConfig {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub modes: Option<StoredShippingModes>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub store_pickup: Option<StoredStorePickup>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub local_delivery: Option<StoredLocalDelivery>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub national_shipping: Option<StoredNationalShipping>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub international_shipping: Option<StoredInternationalShipping>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub free_shipping: Option<StoredFreeShipping>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub notifications: Option<StoredNotifications>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<StoredCustomerInfo>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub additional_rules: Option<StoredAdditionalRules>,
}

impl From<&ShippingConfig> for StoredShippingConfig {
    fn from(config: &ShippingConfig) -> Self {
        let rules = &config.additional_rules;
        let handling = &rules.special_handling;
        StoredShippingConfig {
            version: Some(config.version),
            modes: Some((&config.modes).into()),
            store_pickup: Some((&config.store_pickup).into()),
            local_delivery: Some((&config.local_delivery).into()),
            national_shipping: Some((&config.national_shipping).into()),
            international_shipping: Some((&config.international_shipping).into()),
            free_shipping: Some((&config.free_shipping).into()),
            notifications: Some((&config.notifications).into()),
            customer_info: Some((&config.customer_info).into()),
            additional_rules: Some(StoredAdditionalRules {
                special_handling: Some(StoredSpecialHandling {
                    fragile: Some((&handling.fragile).into()),
                    perishable: Some((&handling.perishable).into()),
                    oversized: Some((&handling.oversized).into()),
                }),
                handling_days: Some(rules.handling_days),
                restricted_items: Some(rules.restricted_items.clone()),
            }),
        }
    }
}

// =============================================================================
// Merge
// =============================================================================

/// Builds a complete configuration from whatever was stored.
///
/// Starts from [`ShippingConfig::default`] and overlays every present key.
/// Missing sections keep their defaults, unknown keys were already dropped
/// by deserialization and the result always carries the current
/// [`SHIPPING_SCHEMA_VERSION`].
///
/// ```rust
/// use vitrina_core::shipping::{merge_shipping_config, ShippingConfig, StoredShippingConfig};
///
/// let stored: StoredShippingConfig =
///     serde_json::from_str(r#"{"modes":{"localDelivery":true}}"#).unwrap();
/// let merged = merge_shipping_config(Some(&stored));
///
/// assert!(merged.modes.local_delivery);
/// assert_eq!(merged.store_pickup, ShippingConfig::default().store_pickup);
/// ```
pub fn merge_shipping_config(stored: Option<&StoredShippingConfig>) -> ShippingConfig {
    let mut config = ShippingConfig::default();
    let Some(stored) = stored else {
        return config;
    };

    if let Some(modes) = &stored.modes {
        modes.overlay(&mut config.modes);
    }
    if let Some(pickup) = &stored.store_pickup {
        pickup.overlay(&mut config.store_pickup);
    }
    if let Some(local) = &stored.local_delivery {
        local.overlay(&mut config.local_delivery);
    }
    if let Some(national) = &stored.national_shipping {
        national.overlay(&mut config.national_shipping);
    }
    if let Some(international) = &stored.international_shipping {
        international.overlay(&mut config.international_shipping);
    }
    if let Some(free) = &stored.free_shipping {
        free.overlay(&mut config.free_shipping);
    }
    if let Some(notifications) = &stored.notifications {
        notifications.overlay(&mut config.notifications);
    }
    if let Some(customer) = &stored.customer_info {
        customer.overlay(&mut config.customer_info);
    }

    if let Some(rules) = &stored.additional_rules {
        let target = &mut config.additional_rules;
        if let Some(days) = rules.handling_days {
            target.handling_days = days;
        }
        if let Some(items) = &rules.restricted_items {
            target.restricted_items = items.clone();
        }
        if let Some(handling) = &rules.special_handling {
            let target = &mut target.special_handling;
            if let Some(rule) = &handling.fragile {
                rule.overlay(&mut target.fragile);
            }
            if let Some(rule) = &handling.perishable {
                rule.overlay(&mut target.perishable);
            }
            if let Some(rule) = &handling.oversized {
                rule.overlay(&mut target.oversized);
            }
        }
    }

    config
}

/// Copies the store's general address into an empty pickup address.
///
/// Only applies on first load, when no shipping configuration had been
/// stored yet. One-directional: later edits to either address are not
/// propagated. Returns `true` when the address was filled in.
pub fn autofill_pickup_address(
    config: &mut ShippingConfig,
    location: &StoreLocation,
    had_stored_config: bool,
) -> bool {
    if had_stored_config
        || !location.has_address()
        || !config.store_pickup.address.trim().is_empty()
    {
        return false;
    }

    config.store_pickup.address = location.address.trim().to_string();
    true
}

// =============================================================================
// Typed Updates
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    EmailOnOrder,
    EmailOnDispatch,
    WhatsappUpdates,
    TrackingLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CustomerField {
    Phone,
    AddressReference,
    DocumentId,
    DeliveryNotes,
}

/// One edit made in the shipping form.
///
/// ## Wire Format
/// ```json
/// { "op": "setMode", "value": { "mode": "localDelivery", "enabled": true } }
/// { "op": "setPickupAddress", "value": "Av. Arequipa 123" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum ShippingUpdate {
    SetMode { mode: DeliveryMode, enabled: bool },

    SetPickupAddress(String),
    SetPickupSchedule(String),
    SetPickupInstructions(String),
    SetPickupPreparationTime(String),

    SetLocalBaseCost(i64),
    SetLocalEstimatedTime(String),
    SetLocalMaxDistance(f64),

    SetNationalBaseCost(i64),
    SetNationalCostPerKg(i64),
    SetNationalEstimatedDays(String),
    AddNationalZone(String),
    RemoveNationalZone(String),
    AddCarrier(String),
    RemoveCarrier(String),

    SetInternationalBaseCost(i64),
    SetInternationalCostPerKg(i64),
    SetInternationalEstimatedDays(String),
    AddCountry(String),
    RemoveCountry(String),

    SetFreeShipping(bool),
    SetFreeShippingMinimum(i64),
    SetFreeShippingModes(Vec<DeliveryMode>),

    SetNotification { kind: NotificationKind, enabled: bool },
    SetCustomerField { field: CustomerField, enabled: bool },

    SetSpecialHandling {
        kind: HandlingKind,
        enabled: bool,
        surcharge_cents: i64,
    },
    SetHandlingNotes { kind: HandlingKind, notes: String },
    SetHandlingDays(i64),
    SetRestrictedItems(Vec<String>),
}

/// Adds a trimmed, non-empty value once.
fn push_unique(list: &mut Vec<String>, value: String) {
    let value = value.trim().to_string();
    if !value.is_empty() && !list.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
        list.push(value);
    }
}

fn remove_value(list: &mut Vec<String>, value: &str) {
    list.retain(|v| !v.eq_ignore_ascii_case(value.trim()));
}

impl ShippingConfig {
    /// Applies one form edit. Values are checked by [`ShippingConfig::validate`]
    /// before saving, not here, so the form can hold intermediate input.
    pub fn apply(&mut self, update: ShippingUpdate) {
        use ShippingUpdate::*;

        match update {
            SetMode { mode, enabled } => self.modes.set(mode, enabled),

            SetPickupAddress(v) => self.store_pickup.address = v,
            SetPickupSchedule(v) => self.store_pickup.schedule = v,
            SetPickupInstructions(v) => self.store_pickup.instructions = v,
            SetPickupPreparationTime(v) => self.store_pickup.preparation_time = v,

            SetLocalBaseCost(v) => self.local_delivery.base_cost_cents = v,
            SetLocalEstimatedTime(v) => self.local_delivery.estimated_time = v,
            SetLocalMaxDistance(v) => self.local_delivery.max_distance_km = v,

            SetNationalBaseCost(v) => self.national_shipping.base_cost_cents = v,
            SetNationalCostPerKg(v) => self.national_shipping.cost_per_kg_cents = v,
            SetNationalEstimatedDays(v) => self.national_shipping.estimated_days = v,
            AddNationalZone(v) => push_unique(&mut self.national_shipping.zones, v),
            RemoveNationalZone(v) => remove_value(&mut self.national_shipping.zones, &v),
            AddCarrier(v) => push_unique(&mut self.national_shipping.carriers, v),
            RemoveCarrier(v) => remove_value(&mut self.national_shipping.carriers, &v),

            SetInternationalBaseCost(v) => self.international_shipping.base_cost_cents = v,
            SetInternationalCostPerKg(v) => self.international_shipping.cost_per_kg_cents = v,
            SetInternationalEstimatedDays(v) => self.international_shipping.estimated_days = v,
            AddCountry(v) => push_unique(&mut self.international_shipping.countries, v),
            RemoveCountry(v) => remove_value(&mut self.international_shipping.countries, &v),

            SetFreeShipping(v) => self.free_shipping.enabled = v,
            SetFreeShippingMinimum(v) => self.free_shipping.minimum_cents = v,
            SetFreeShippingModes(modes) => {
                let mut unique = Vec::with_capacity(modes.len());
                for mode in modes {
                    if !unique.contains(&mode) {
                        unique.push(mode);
                    }
                }
                self.free_shipping.applies_to = unique;
            }

            SetNotification { kind, enabled } => {
                let n = &mut self.notifications;
                match kind {
                    NotificationKind::EmailOnOrder => n.email_on_order = enabled,
                    NotificationKind::EmailOnDispatch => n.email_on_dispatch = enabled,
                    NotificationKind::WhatsappUpdates => n.whatsapp_updates = enabled,
                    NotificationKind::TrackingLink => n.tracking_link = enabled,
                }
            }
            SetCustomerField { field, enabled } => {
                let c = &mut self.customer_info;
                match field {
                    CustomerField::Phone => c.require_phone = enabled,
                    CustomerField::AddressReference => c.require_address_reference = enabled,
                    CustomerField::DocumentId => c.require_document_id = enabled,
                    CustomerField::DeliveryNotes => c.allow_delivery_notes = enabled,
                }
            }

            SetSpecialHandling {
                kind,
                enabled,
                surcharge_cents,
            } => {
                let rule = self.additional_rules.special_handling.rule_mut(kind);
                rule.enabled = enabled;
                rule.surcharge_cents = surcharge_cents;
            }
            SetHandlingNotes { kind, notes } => {
                self.additional_rules.special_handling.rule_mut(kind).notes = notes;
            }
            SetHandlingDays(v) => self.additional_rules.handling_days = v,
            SetRestrictedItems(v) => self.additional_rules.restricted_items = v,
        }
    }

    /// Checks the configuration before it is saved.
    pub fn validate(&self) -> ValidationResult<()> {
        if !self.modes.any_enabled() {
            return Err(ValidationError::invalid(
                "modes",
                "at least one delivery mode must be enabled",
            ));
        }

        validate_price_cents("localDelivery.baseCost", self.local_delivery.base_cost_cents)?;
        validate_price_cents("nationalShipping.baseCost", self.national_shipping.base_cost_cents)?;
        validate_price_cents(
            "nationalShipping.costPerKg",
            self.national_shipping.cost_per_kg_cents,
        )?;
        validate_price_cents(
            "internationalShipping.baseCost",
            self.international_shipping.base_cost_cents,
        )?;
        validate_price_cents(
            "internationalShipping.costPerKg",
            self.international_shipping.cost_per_kg_cents,
        )?;

        if !self.local_delivery.max_distance_km.is_finite()
            || self.local_delivery.max_distance_km < 0.0
        {
            return Err(ValidationError::Negative {
                field: "localDelivery.maxDistanceKm".to_string(),
            });
        }

        if self.modes.national_shipping && self.national_shipping.zones.is_empty() {
            return Err(ValidationError::required("nationalShipping.zones"));
        }

        if self.modes.international_shipping && self.international_shipping.countries.is_empty()
        {
            return Err(ValidationError::required("internationalShipping.countries"));
        }

        if self.free_shipping.enabled && self.free_shipping.minimum_cents <= 0 {
            return Err(ValidationError::OutOfRange {
                field: "freeShipping.minimum".to_string(),
                min: 1,
                max: i64::MAX,
            });
        }

        let handling = &self.additional_rules.special_handling;
        for (field, rule) in [
            ("specialHandling.fragile", &handling.fragile),
            ("specialHandling.perishable", &handling.perishable),
            ("specialHandling.oversized", &handling.oversized),
        ] {
            validate_price_cents(field, rule.surcharge_cents)?;
        }

        if self.additional_rules.handling_days < 0 {
            return Err(ValidationError::Negative {
                field: "additionalRules.handlingDays".to_string(),
            });
        }

        Ok(())
    }

    /// True when free shipping covers `mode` for an order of `subtotal`.
    pub fn free_shipping_applies(&self, subtotal: Money, mode: DeliveryMode) -> bool {
        let free = &self.free_shipping;
        free.enabled
            && free.applies_to.contains(&mode)
            && subtotal.cents() >= free.minimum_cents
    }

    /// Base cost of a delivery mode before free-shipping rules.
    pub fn base_cost(&self, mode: DeliveryMode) -> Money {
        Money::from_cents(match mode {
            DeliveryMode::StorePickup => 0,
            DeliveryMode::LocalDelivery => self.local_delivery.base_cost_cents,
            DeliveryMode::NationalShipping => self.national_shipping.base_cost_cents,
            DeliveryMode::InternationalShipping => self.international_shipping.base_cost_cents,
        })
    }

    /// Shipping due for an order of `subtotal` delivered via `mode`.
    ///
    /// ## Flow
    /// ```text
    /// mode enabled? ── no ──► ShippingModeDisabled
    ///      │ yes
    ///      ▼
    /// free shipping applies? ── yes ──► 0
    ///      │ no
    ///      ▼
    /// base_cost(mode)
    /// ```
    pub fn quote(&self, subtotal: Money, mode: DeliveryMode) -> CoreResult<Money> {
        self.quote_with_base(subtotal, mode, self.base_cost(mode))
    }

    /// Like [`ShippingConfig::quote`] with an explicit base cost, e.g. the
    /// price of the delivery zone the address falls in.
    pub fn quote_with_base(
        &self,
        subtotal: Money,
        mode: DeliveryMode,
        base: Money,
    ) -> CoreResult<Money> {
        if !self.modes.is_enabled(mode) {
            return Err(CoreError::ShippingModeDisabled(mode.to_string()));
        }

        if self.free_shipping_applies(subtotal, mode) {
            return Ok(Money::zero());
        }

        Ok(base)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
