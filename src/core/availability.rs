use crate::models::{AvailabilityTier, ShelterRecord};

/// Shelters with more than this share of beds free report `High`
pub const HIGH_AVAILABILITY_RATIO: f64 = 0.2;

/// Classify remaining bed capacity
///
/// `capacity_total` must be positive whenever beds are available; the ratio
/// is never computed for a shelter with no free beds.
#[inline]
pub fn availability_tier(shelter: &ShelterRecord) -> AvailabilityTier {
    if shelter.capacity_available == 0 {
        return AvailabilityTier::None;
    }

    let ratio = shelter.capacity_available as f64 / shelter.capacity_total as f64;
    if ratio > HIGH_AVAILABILITY_RATIO {
        AvailabilityTier::High
    } else {
        AvailabilityTier::Low
    }
}
