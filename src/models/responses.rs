use serde::{Deserialize, Serialize};

use crate::core::{availability::availability_tier, distance::format_distance};
use crate::models::domain::{AvailabilityTier, GenderPolicy, RankedShelter, ShelterRecord};
use crate::models::listing::RejectedListing;

/// Shelter as presented to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterView {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(rename = "distanceLabel")]
    pub distance_label: Option<String>,
    #[serde(rename = "isOpen")]
    pub is_open: bool,
    pub availability: AvailabilityTier,
    #[serde(rename = "availableBeds")]
    pub available_beds: u32,
    #[serde(rename = "totalBeds")]
    pub total_beds: u32,
    pub gender: GenderPolicy,
    #[serde(rename = "petFriendly")]
    pub pet_friendly: bool,
    #[serde(rename = "wheelchairAccessible")]
    pub wheelchair_accessible: bool,
    pub hours: String,
}

impl ShelterView {
    pub fn new(shelter: &ShelterRecord, distance_km: Option<f64>, is_open: bool) -> Self {
        Self {
            id: shelter.id.clone(),
            name: shelter.name.clone(),
            address: shelter.address.clone(),
            phone: shelter.phone.clone(),
            latitude: shelter.location.latitude,
            longitude: shelter.location.longitude,
            distance_km,
            distance_label: distance_km.filter(|km| km.is_finite()).map(format_distance),
            is_open,
            availability: availability_tier(shelter),
            available_beds: shelter.capacity_available,
            total_beds: shelter.capacity_total,
            gender: shelter.gender_policy,
            pet_friendly: shelter.pet_friendly,
            wheelchair_accessible: shelter.wheelchair_accessible,
            hours: shelter.hours.to_string(),
        }
    }

    pub fn ranked(ranked: &RankedShelter<'_>, is_open: bool) -> Self {
        Self::new(ranked.shelter, Some(ranked.distance_km), is_open)
    }
}

/// Response for the rank and nearby endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse {
    pub results: Vec<ShelterView>,
    pub count: usize,
    pub hour: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedListing>,
}

/// Paginated catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub page: u32,
    pub limit: usize,
    pub total: usize,
    #[serde(rename = "hasNext")]
    pub has_next: bool,
    pub results: Vec<ShelterView>,
}

/// Offline snapshot of the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub count: usize,
    pub results: Vec<ShelterView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyResponse {
    pub shelter: Option<ShelterView>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub shelters: Option<usize>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
