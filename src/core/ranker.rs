use std::cmp::Ordering;

use crate::core::{
    distance::{calculate_bounding_box, distance_km, is_within_bounding_box},
    filters::{matches_filters_with, FilterSpec},
    hours::{is_open_with, DaytimeHours},
};
use crate::models::{GeoPoint, RankedShelter, ShelterRecord};

/// Parameters for a radius/limit bounded search
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub filters: FilterSpec,
    pub current_hour: u8,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

/// Distance ranking and availability filtering over an in-memory shelter list
///
/// # Pipeline
/// 1. Great-circle distance from the reference point to every shelter
/// 2. Conjunctive filter tags
/// 3. Stable ascending sort by distance
///
/// The ranker holds no state besides its configuration; every call works on
/// its own arguments only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShelterRanker {
    daytime_hours: DaytimeHours,
}

impl ShelterRanker {
    pub fn new(daytime_hours: DaytimeHours) -> Self {
        Self { daytime_hours }
    }

    pub fn daytime_hours(&self) -> DaytimeHours {
        self.daytime_hours
    }

    pub fn is_open(&self, shelter: &ShelterRecord, current_hour: u8) -> bool {
        is_open_with(shelter.hours, current_hour, self.daytime_hours)
    }

    /// Rank shelters by distance from `origin`, keeping those that satisfy `filters`
    ///
    /// Equal distances keep their input order. NaN distances sort after every
    /// other distance, infinities sort at their numeric position.
    pub fn rank<'a>(
        &self,
        origin: GeoPoint,
        shelters: &'a [ShelterRecord],
        filters: &FilterSpec,
        current_hour: u8,
    ) -> Vec<RankedShelter<'a>> {
        let mut ranked: Vec<RankedShelter<'a>> = shelters
            .iter()
            .map(|shelter| RankedShelter {
                shelter,
                distance_km: distance_km(origin, shelter.location),
            })
            .filter(|ranked| matches_filters_with(ranked.shelter, filters, current_hour, self.daytime_hours))
            .collect();

        sort_by_distance(&mut ranked);
        ranked
    }

    /// `rank` restricted to `query.radius_km` and truncated to `query.limit`
    pub fn search<'a>(
        &self,
        origin: GeoPoint,
        shelters: &'a [ShelterRecord],
        query: &SearchQuery,
    ) -> Vec<RankedShelter<'a>> {
        let bounding_box = query.radius_km.map(|radius| calculate_bounding_box(origin, radius));

        let mut ranked: Vec<RankedShelter<'a>> = shelters
            .iter()
            // Stage 1: bounding box pre-filter
            .filter(|shelter| {
                bounding_box
                    .as_ref()
                    .map_or(true, |bbox| is_within_bounding_box(shelter.location, bbox))
            })
            // Stage 2: exact distance and radius
            .map(|shelter| RankedShelter {
                shelter,
                distance_km: distance_km(origin, shelter.location),
            })
            .filter(|ranked| query.radius_km.map_or(true, |radius| ranked.distance_km <= radius))
            // Stage 3: filter tags
            .filter(|ranked| {
                matches_filters_with(ranked.shelter, &query.filters, query.current_hour, self.daytime_hours)
            })
            .collect();

        sort_by_distance(&mut ranked);

        if let Some(limit) = query.limit {
            ranked.truncate(limit);
        }

        ranked
    }

    /// Closest shelter that is open now and still has a free bed
    pub fn nearest_available<'a>(
        &self,
        origin: GeoPoint,
        shelters: &'a [ShelterRecord],
        current_hour: u8,
    ) -> Option<RankedShelter<'a>> {
        shelters
            .iter()
            .filter(|shelter| shelter.capacity_available > 0 && self.is_open(shelter, current_hour))
            .map(|shelter| RankedShelter {
                shelter,
                distance_km: distance_km(origin, shelter.location),
            })
            .min_by(compare_distance)
    }
}

/// Strict total order on distance: NaN last, then `total_cmp`
fn compare_distance(a: &RankedShelter<'_>, b: &RankedShelter<'_>) -> Ordering {
    a.distance_km
        .is_nan()
        .cmp(&b.distance_km.is_nan())
        .then_with(|| a.distance_km.total_cmp(&b.distance_km))
}

/// Stable ascending sort by distance
fn sort_by_distance(ranked: &mut [RankedShelter<'_>]) {
    ranked.sort_by(compare_distance);
}

/// Rank with the default daytime-hours behaviour
pub fn rank<'a>(
    origin: GeoPoint,
    shelters: &'a [ShelterRecord],
    filters: &FilterSpec,
    current_hour: u8,
) -> Vec<RankedShelter<'a>> {
    ShelterRanker::default().rank(origin, shelters, filters, current_hour)
}
