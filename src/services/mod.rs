// Service exports
pub mod cache;
pub mod catalog;
pub mod listing;

pub use cache::{CacheKey, ListingCache, Snapshot};
pub use catalog::{CatalogError, ShelterCatalog};
pub use listing::{ListingClient, ListingClientError};
