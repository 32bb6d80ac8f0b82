use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{CacheSettings, ListingSettings, ListingSource};
use crate::models::{adapt_listings, ListingError, ListingShelter, ShelterRecord};
use crate::services::cache::{CacheKey, ListingCache, Snapshot};
use crate::services::listing::{ListingClient, ListingClientError};

/// Errors that can occur while providing shelter records
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read seed file {path}: {source}")]
    SeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Seed file {path} is not valid JSON: {source}")]
    SeedFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Listing(#[from] ListingClientError),

    #[error(transparent)]
    Rejected(#[from] ListingError),
}

enum Source {
    Static(Snapshot),
    Remote { client: ListingClient, cache: ListingCache },
}

/// Supplies canonical shelter records to the HTTP layer
///
/// Either a fixed list loaded once at startup, or the remote listing API
/// with a TTL-cached snapshot.
pub struct ShelterCatalog {
    source: Source,
}

impl ShelterCatalog {
    pub fn from_records(records: Vec<ShelterRecord>) -> Self {
        Self {
            source: Source::Static(Arc::new(records)),
        }
    }

    pub fn remote(client: ListingClient, cache: ListingCache) -> Self {
        Self {
            source: Source::Remote { client, cache },
        }
    }

    /// Load a JSON array of listings from disk, skipping records the adapter rejects
    pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let path_label = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::SeedIo {
            path: path_label.clone(),
            source,
        })?;
        let listings: Vec<ListingShelter> = serde_json::from_str(&raw).map_err(|source| CatalogError::SeedFormat {
            path: path_label.clone(),
            source,
        })?;

        let (records, rejected) = adapt_listings(listings);
        tracing::info!(
            "Loaded {} shelters from {} ({} rejected)",
            records.len(),
            path_label,
            rejected.len()
        );

        Ok(Self::from_records(records))
    }

    pub fn from_settings(listing: &ListingSettings, cache: &CacheSettings) -> Result<Self, CatalogError> {
        match listing.source {
            ListingSource::Static => Self::load_seed(&listing.seed_path),
            ListingSource::Remote => {
                let client = ListingClient::new(listing.endpoint.clone(), Duration::from_secs(listing.timeout_secs))?;
                let cache = ListingCache::new(cache.max_entries, cache.ttl_secs);
                Ok(Self::remote(client, cache))
            }
        }
    }

    pub fn source_name(&self) -> &'static str {
        match self.source {
            Source::Static(_) => "static",
            Source::Remote { .. } => "remote",
        }
    }

    /// Current shelter list, in provider order
    pub async fn shelters(&self) -> Result<Snapshot, CatalogError> {
        match &self.source {
            Source::Static(records) => Ok(Arc::clone(records)),
            Source::Remote { client, cache } => {
                let key = CacheKey::listing(client.base_url());
                if let Some(snapshot) = cache.get(&key).await {
                    return Ok(snapshot);
                }

                let listings = client.fetch_shelters().await?;
                let (records, rejected) = adapt_listings(listings);
                if !rejected.is_empty() {
                    tracing::warn!("Listing API returned {} unusable shelters", rejected.len());
                }

                let snapshot: Snapshot = Arc::new(records);
                cache.insert(&key, Arc::clone(&snapshot)).await;
                tracing::debug!("Refreshed listing snapshot: {} shelters", snapshot.len());
                Ok(snapshot)
            }
        }
    }

    /// Look up one shelter by id
    pub async fn find(&self, shelter_id: &str) -> Result<Option<ShelterRecord>, CatalogError> {
        let snapshot = self.shelters().await?;
        if let Some(found) = snapshot.iter().find(|s| s.id == shelter_id) {
            return Ok(Some(found.clone()));
        }

        let Source::Remote { client, cache } = &self.source else {
            return Ok(None);
        };

        // Not in the cached snapshot; it may have been registered since the last refresh
        match client.fetch_shelter(shelter_id).await {
            Ok(listing) => {
                let record = ShelterRecord::try_from(listing)?;
                cache.invalidate(&CacheKey::listing(client.base_url())).await;
                Ok(Some(record))
            }
            Err(ListingClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
