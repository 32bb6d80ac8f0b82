// Model exports
pub mod domain;
pub mod listing;
pub mod requests;
pub mod responses;

pub use domain::{AvailabilityTier, BoundingBox, GenderPolicy, GeoPoint, HoursParseError, HoursSpec, RankedShelter, ShelterRecord};
pub use listing::{adapt_listings, ListingError, ListingShelter, RejectedListing};
pub use requests::{EmergencyQuery, NearbyQuery, PageQuery, PointQuery, RankSheltersRequest};
pub use responses::{EmergencyResponse, ErrorResponse, HealthResponse, PageResponse, RankResponse, ShelterView, SnapshotResponse};
