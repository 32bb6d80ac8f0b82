use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::models::ShelterRecord;

/// Adapted listing snapshot, shared read-only between requests
pub type Snapshot = Arc<Vec<ShelterRecord>>;

/// In-memory TTL cache for adapted listing snapshots
///
/// Lives in the service layer only; the ranker never sees it.
#[derive(Clone)]
pub struct ListingCache {
    snapshots: Cache<String, Snapshot>,
}

impl ListingCache {
    /// Create a new cache
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let snapshots = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { snapshots }
    }

    pub async fn get(&self, key: &str) -> Option<Snapshot> {
        let hit = self.snapshots.get(key).await;
        tracing::trace!("Listing cache {}: {}", if hit.is_some() { "hit" } else { "miss" }, key);
        hit
    }

    pub async fn insert(&self, key: &str, snapshot: Snapshot) {
        self.snapshots.insert(key.to_string(), snapshot).await;
        tracing::trace!("Listing cache set: {}", key);
    }

    pub async fn invalidate(&self, key: &str) {
        self.snapshots.invalidate(key).await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key of the full listing snapshot from a given endpoint
    pub fn listing(endpoint: &str) -> String {
        format!("listing:{}", endpoint.trim_end_matches('/'))
    }
}
