// Core algorithm exports
pub mod availability;
pub mod distance;
pub mod filters;
pub mod hours;
pub mod ranker;

pub use availability::availability_tier;
pub use distance::{calculate_bounding_box, distance_km, format_distance, haversine_distance, is_within_bounding_box};
pub use filters::{matches_filters, matches_filters_with, FilterSpec, FilterTag};
pub use hours::{is_open, is_open_with, DaytimeHours};
pub use ranker::{rank, SearchQuery, ShelterRanker};
