//! Shelter Finder - distance ranking and availability filtering for shelter listings
//!
//! The ranking core (`core`) is pure and synchronous: given a reference point,
//! a shelter list, a set of filter tags and the viewer's wall-clock hour it
//! returns the matching shelters ordered by great-circle distance. The
//! `services` and `routes` modules wire it to a listing provider and an HTTP API.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{availability_tier, distance_km, is_open, matches_filters, rank, FilterSpec, FilterTag, ShelterRanker};
pub use models::{AvailabilityTier, GenderPolicy, GeoPoint, HoursSpec, RankedShelter, ShelterRecord};
