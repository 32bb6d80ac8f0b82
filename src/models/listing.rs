use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::domain::{GenderPolicy, GeoPoint, HoursParseError, HoursSpec, ShelterRecord};

/// Reasons a listing cannot become a `ShelterRecord`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListingError {
    #[error("listing has no id")]
    MissingId,

    #[error("shelter {0} has no coordinates")]
    MissingLocation(String),

    #[error("shelter {0} has non-finite coordinates")]
    NonFiniteLocation(String),

    #[error("shelter {id} reports {available} available beds out of {total}")]
    InvalidCapacity { id: String, available: u32, total: u32 },
}

impl ListingError {
    /// Id of the offending listing, when it had one
    pub fn listing_id(&self) -> Option<&str> {
        match self {
            ListingError::MissingId => None,
            ListingError::MissingLocation(id) | ListingError::NonFiniteLocation(id) => Some(id),
            ListingError::InvalidCapacity { id, .. } => Some(id),
        }
    }
}

/// GeoJSON point as stored by the listing backend: `[lng, lat]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFeatures {
    #[serde(rename = "petFriendly", alias = "pet_friendly", default)]
    pub pet_friendly: Option<bool>,
    #[serde(default)]
    pub accessibility: Option<bool>,
}

/// Shelter as it arrives from a data provider
///
/// Accepts both the static table layout (`latitude`, `capacity`,
/// `available_beds`, ...) and the backend document layout (`_id`, GeoJSON
/// `location`, `total_beds`, `availableBeds`, `features`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingShelter {
    #[serde(alias = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(alias = "lat", default)]
    pub latitude: Option<f64>,
    #[serde(alias = "lng", default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub location: Option<GeoJsonPoint>,
    #[serde(alias = "total_beds", default)]
    pub capacity: Option<u32>,
    #[serde(alias = "availableBeds", default)]
    pub available_beds: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(alias = "petFriendly", alias = "pets_allowed", default)]
    pub pet_friendly: Option<bool>,
    #[serde(alias = "wheelchairAccessible", default)]
    pub accessibility: Option<bool>,
    #[serde(alias = "familyFriendly", default)]
    pub family_friendly: Option<bool>,
    #[serde(default)]
    pub features: Option<ListingFeatures>,
    #[serde(alias = "openHours", default)]
    pub open_hours: Option<String>,
    #[serde(alias = "is24Hour", default)]
    pub is_24_hour: Option<bool>,
}

impl ListingShelter {
    /// Top-level coordinates win over the GeoJSON `location`
    fn point(&self) -> Option<GeoPoint> {
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            return Some(GeoPoint::new(latitude, longitude));
        }

        match self.location.as_ref().map(|l| l.coordinates.as_slice()) {
            Some([lng, lat, ..]) => Some(GeoPoint::new(*lat, *lng)),
            _ => None,
        }
    }
}

impl TryFrom<ListingShelter> for ShelterRecord {
    type Error = ListingError;

    fn try_from(listing: ListingShelter) -> Result<Self, Self::Error> {
        let id = listing
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ListingError::MissingId)?;

        let location = listing
            .point()
            .ok_or_else(|| ListingError::MissingLocation(id.clone()))?;
        if !location.is_finite() {
            return Err(ListingError::NonFiniteLocation(id));
        }

        let capacity_total = listing.capacity.unwrap_or(0);
        let capacity_available = listing.available_beds.unwrap_or(0);
        if capacity_available > capacity_total {
            return Err(ListingError::InvalidCapacity {
                id,
                available: capacity_available,
                total: capacity_total,
            });
        }

        let hours = match (listing.is_24_hour, listing.open_hours.as_deref()) {
            (Some(true), _) | (_, None) => HoursSpec::AlwaysOpen,
            // An hours label nobody can read should not hide the shelter
            (_, Some(label)) => label.parse().unwrap_or_else(|e: HoursParseError| {
                tracing::warn!(id = %id, "Treating shelter as always open, hours {:?}: {}", label, e);
                HoursSpec::AlwaysOpen
            }),
        };

        let gender_policy = match listing.gender.as_deref() {
            Some(label) => GenderPolicy::from_label(label),
            None if listing.family_friendly == Some(true) => GenderPolicy::Family,
            None => GenderPolicy::All,
        };

        let features = listing.features.unwrap_or_default();

        Ok(ShelterRecord {
            id,
            name: listing.name.unwrap_or_default(),
            address: listing.address,
            phone: listing.phone,
            location,
            capacity_total,
            capacity_available,
            gender_policy,
            pet_friendly: listing.pet_friendly.or(features.pet_friendly).unwrap_or(false),
            wheelchair_accessible: listing.accessibility.or(features.accessibility).unwrap_or(false),
            hours,
        })
    }
}

/// A listing the adapter refused, reported back to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedListing {
    pub id: Option<String>,
    pub reason: String,
}

impl From<ListingError> for RejectedListing {
    fn from(err: ListingError) -> Self {
        Self {
            id: err.listing_id().map(str::to_string),
            reason: err.to_string(),
        }
    }
}

/// Adapt a batch of listings, keeping input order and collecting rejects
pub fn adapt_listings<I>(listings: I) -> (Vec<ShelterRecord>, Vec<RejectedListing>)
where
    I: IntoIterator<Item = ListingShelter>,
{
    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for listing in listings {
        match ShelterRecord::try_from(listing) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(id = ?e.listing_id(), "Skipping shelter listing: {}", e);
                rejected.push(RejectedListing::from(e));
            }
        }
    }

    (records, rejected)
}
