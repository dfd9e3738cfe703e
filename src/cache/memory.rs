use crate::cache::{CacheStats, CatalogCache, CATALOG_CACHE_KEY};
use crate::models::Exercise;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory catalog cache backed by moka with TTL and bounded capacity.
pub struct MemoryCatalogCache {
    catalogs: Cache<String, Arc<Vec<Exercise>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCatalogCache {
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let catalogs = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        MemoryCatalogCache {
            catalogs,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl CatalogCache for MemoryCatalogCache {
    async fn get_catalog(&self) -> Option<Vec<Exercise>> {
        match self.catalogs.get(CATALOG_CACHE_KEY).await {
            Some(snapshot) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Memory cache hit for catalog ({} exercises)", snapshot.len());
                Some((*snapshot).clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Memory cache miss for catalog");
                None
            }
        }
    }

    async fn cache_catalog(&self, exercises: &[Exercise]) {
        self.catalogs
            .insert(CATALOG_CACHE_KEY.to_string(), Arc::new(exercises.to_vec()))
            .await;
        tracing::debug!("Memory cached catalog of {} exercises", exercises.len());
    }

    async fn invalidate(&self) {
        self.catalogs.invalidate(CATALOG_CACHE_KEY).await;
    }

    async fn get_stats(&self) -> CacheStats {
        CacheStats::from_counts(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            true,
        )
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
