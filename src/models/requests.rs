use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::filters::FilterSpec;
use crate::models::domain::GeoPoint;
use crate::models::listing::ListingShelter;

/// Rank a caller supplied shelter list
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankSheltersRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "lng")]
    pub longitude: f64,
    #[serde(default)]
    pub shelters: Vec<ListingShelter>,
    #[serde(default)]
    pub filters: FilterSpec,
    #[validate(range(max = 23))]
    #[serde(default)]
    pub hour: Option<u8>,
}

impl RankSheltersRequest {
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Query strings accept `NaN` and `inf`, which range checks let through
fn require_finite(values: &[Option<f64>]) -> Result<(), ValidationError> {
    if values.iter().flatten().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ValidationError::new("non_finite_number"))
    }
}

fn finite_nearby(query: &NearbyQuery) -> Result<(), ValidationError> {
    require_finite(&[Some(query.lat), Some(query.lng), query.radius_km])
}

fn finite_point(query: &PointQuery) -> Result<(), ValidationError> {
    require_finite(&[query.lat, query.lng])
}

fn finite_emergency(query: &EmergencyQuery) -> Result<(), ValidationError> {
    require_finite(&[Some(query.lat), Some(query.lng)])
}

/// GET /shelters/nearby
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "finite_nearby"))]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    /// Comma separated filter tags
    #[serde(default)]
    pub filters: Option<String>,
    #[validate(range(max = 23))]
    #[serde(default)]
    pub hour: Option<u8>,
    #[validate(range(min = 0.1, max = 20000.0))]
    #[serde(rename = "radiusKm", alias = "radius_km", default)]
    pub radius_km: Option<f64>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<usize>,
}

impl NearbyQuery {
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn filter_spec(&self) -> FilterSpec {
        self.filters.as_deref().map(FilterSpec::parse_list).unwrap_or_default()
    }
}

/// Optional reference point, used by the detail and snapshot endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "finite_point"))]
pub struct PointQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default)]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default)]
    pub lng: Option<f64>,
    #[validate(range(max = 23))]
    #[serde(default)]
    pub hour: Option<u8>,
}

impl PointQuery {
    /// Only a complete latitude/longitude pair counts as a reference point
    pub fn origin(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}

/// GET /emergency/nearest
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "finite_emergency"))]
pub struct EmergencyQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(range(max = 23))]
    #[serde(default)]
    pub hour: Option<u8>,
}

impl EmergencyQuery {
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// GET /shelters
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub page: Option<u32>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<usize>,
    #[validate(range(max = 23))]
    #[serde(default)]
    pub hour: Option<u8>,
}
