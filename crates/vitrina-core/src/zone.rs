//! # Delivery Zones
//!
//! Geographic areas with their own local-delivery price.
//!
//! ```text
//!   poligono                         circulo
//!   ┌───────────────┐                   .-~~~-.
//!   │  ● customer   │                 /    r    \
//!   │   (inside)    │                |  ●───►    |
//!   └───────────────┘                 \ center  /
//!   ray casting                         `-...-'
//!                                     haversine ≤ r
//! ```
//!
//! Zones are stored in the per-store `delivery_zones` table; the shipping
//! configuration only keeps local-delivery settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{validate_price_cents, ValidationResult};

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance in meters.
    pub fn distance_m(&self, other: &LatLng) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// Outline of a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "tipo")]
pub enum ZoneShape {
    #[serde(rename = "poligono")]
    Polygon {
        #[serde(rename = "coordenadas")]
        vertices: Vec<LatLng>,
    },
    #[serde(rename = "circulo")]
    Circle {
        #[serde(rename = "centro")]
        center: LatLng,
        #[serde(rename = "radioMetros")]
        radius_m: f64,
    },
}

impl ZoneShape {
    /// Rejects degenerate shapes: fewer than 3 vertices, a non-positive
    /// radius or coordinates off the globe.
    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            ZoneShape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(ValidationError::invalid(
                        "coordenadas",
                        "a polygon needs at least 3 vertices",
                    ));
                }
                if !vertices.iter().all(LatLng::is_valid) {
                    return Err(ValidationError::invalid("coordenadas", "coordinate out of range"));
                }
            }
            ZoneShape::Circle { center, radius_m } => {
                if !center.is_valid() {
                    return Err(ValidationError::invalid("centro", "coordinate out of range"));
                }
                if !radius_m.is_finite() || *radius_m <= 0.0 {
                    return Err(ValidationError::invalid("radioMetros", "radius must be positive"));
                }
            }
        }
        Ok(())
    }

    /// True when the point lies inside the shape.
    ///
    /// Polygons are treated as planar in lat/lng space, which is accurate
    /// enough for city-sized areas away from the antimeridian.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        match self {
            ZoneShape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return false;
                }
                let mut inside = false;
                let mut j = vertices.len() - 1;
                for i in 0..vertices.len() {
                    let (vi, vj) = (&vertices[i], &vertices[j]);
                    if (vi.lat > lat) != (vj.lat > lat)
                        && lng < (vj.lng - vi.lng) * (lat - vi.lat) / (vj.lat - vi.lat) + vi.lng
                    {
                        inside = !inside;
                    }
                    j = i;
                }
                inside
            }
            ZoneShape::Circle { center, radius_m } => {
                center.distance_m(&LatLng::new(lat, lng)) <= *radius_m
            }
        }
    }
}

/// A delivery zone as shown on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZone {
    pub id: String,
    pub store_id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(flatten)]
    pub shape: ZoneShape,
    #[serde(rename = "precioCents")]
    pub price_cents: i64,
    /// Map fill color, `#rrggbb`.
    pub color: String,
    pub estimated_time: String,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Form input for creating or replacing a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZoneInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(flatten)]
    pub shape: ZoneShape,
    #[serde(rename = "precioCents")]
    pub price_cents: i64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_color() -> String {
    "#3b82f6".to_string()
}

fn default_active() -> bool {
    true
}

impl DeliveryZoneInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::required("nombre"));
        }
        validate_price_cents("precio", self.price_cents)?;

        let color = self.color.as_bytes();
        if color.len() != 7 || color[0] != b'#' || !color[1..].iter().all(u8::is_ascii_hexdigit) {
            return Err(ValidationError::invalid("color", "expected #rrggbb"));
        }

        self.shape.validate()
    }
}

/// Picks the zone pricing a delivery to `(lat, lng)`.
///
/// Only active zones count. When zones overlap the cheapest wins.
pub fn find_zone(zones: &[DeliveryZone], lat: f64, lng: f64) -> Option<&DeliveryZone> {
    zones
        .iter()
        .filter(|z| z.is_active && z.shape.contains(lat, lng))
        .min_by_key(|z| z.price_cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> ZoneShape {
        ZoneShape::Polygon {
            vertices: vec![
                LatLng::new(-12.0, -77.1),
                LatLng::new(-12.0, -77.0),
                LatLng::new(-12.1, -77.0),
                LatLng::new(-12.1, -77.1),
            ],
        }
    }

    fn zone(id: &str, shape: ZoneShape, price_cents: i64, is_active: bool) -> DeliveryZone {
        let now = Utc::now();
        DeliveryZone {
            id: id.to_string(),
            store_id: "s1".to_string(),
            name: id.to_string(),
            shape,
            price_cents,
            color: "#ff0000".to_string(),
            estimated_time: "1h".to_string(),
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_polygon_contains() {
        let shape = square();
        assert!(shape.contains(-12.05, -77.05));
        assert!(!shape.contains(-12.2, -77.05));
        assert!(!shape.contains(-12.05, -76.9));
    }

    #[test]
    fn test_circle_contains() {
        let shape = ZoneShape::Circle {
            center: LatLng::new(-12.0464, -77.0428),
            radius_m: 1_000.0,
        };
        // ~550 m north
        assert!(shape.contains(-12.0414, -77.0428));
        // ~2.2 km north
        assert!(!shape.contains(-12.0264, -77.0428));
    }

    #[test]
    fn test_haversine_distance() {
        // one degree of latitude is ~111.2 km
        let d = LatLng::new(0.0, 0.0).distance_m(&LatLng::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 100.0);
    }

    #[test]
    fn test_shape_validation() {
        assert!(square().validate().is_ok());
        assert!(ZoneShape::Polygon {
            vertices: vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]
        }
        .validate()
        .is_err());
        assert!(ZoneShape::Circle {
            center: LatLng::new(0.0, 0.0),
            radius_m: 0.0
        }
        .validate()
        .is_err());
        assert!(ZoneShape::Circle {
            center: LatLng::new(95.0, 0.0),
            radius_m: 10.0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_find_zone_prefers_cheapest_active() {
        let big = ZoneShape::Circle {
            center: LatLng::new(-12.05, -77.05),
            radius_m: 20_000.0,
        };
        let zones = vec![
            zone("grande", big, 900, true),
            zone("centro", square(), 500, true),
            zone("inactiva", square(), 100, false),
        ];

        assert_eq!(find_zone(&zones, -12.05, -77.05).unwrap().id, "centro");
        assert_eq!(find_zone(&zones, -12.15, -77.05).unwrap().id, "grande");
        assert!(find_zone(&zones, 10.0, 10.0).is_none());
    }

    #[test]
    fn test_zone_wire_names() {
        let json = serde_json::to_value(zone("centro", square(), 500, true)).unwrap();
        assert_eq!(json["nombre"], "centro");
        assert_eq!(json["tipo"], "poligono");
        assert_eq!(json["precioCents"], 500);
        assert!(json["coordenadas"].is_array());
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn test_input_validation() {
        let input: DeliveryZoneInput = serde_json::from_str(
            r#"{"nombre":"Centro","tipo":"circulo","centro":{"lat":-12.0,"lng":-77.0},"radioMetros":1500,"precioCents":500}"#,
        )
        .unwrap();
        assert!(input.is_active);
        assert!(input.validate().is_ok());

        let bad = DeliveryZoneInput {
            color: "red".into(),
            ..input.clone()
        };
        assert!(bad.validate().is_err());

        let bad = DeliveryZoneInput {
            name: " ".into(),
            ..input
        };
        assert!(matches!(bad.validate(), Err(ValidationError::Required { .. })));
    }
}
