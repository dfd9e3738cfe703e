mod memory;
mod redis;

pub use memory::MemoryCatalogCache;
pub use redis::RedisCatalogCache;

use crate::models::Exercise;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Key under which the full exercise catalog snapshot is stored
pub const CATALOG_CACHE_KEY: &str = "exercise:catalog:v1";

/// Cache for the exercise catalog snapshot. Failures are logged and treated
/// as misses; they never fail a generation request.
#[async_trait]
pub trait CatalogCache: Send + Sync {
    async fn get_catalog(&self) -> Option<Vec<Exercise>>;
    async fn cache_catalog(&self, exercises: &[Exercise]);
    /// Drop the snapshot so the next read goes to the repository
    async fn invalidate(&self);
    async fn get_stats(&self) -> CacheStats;
    async fn health_check(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub connected: bool,
}

impl CacheStats {
    pub fn from_counts(hits: u64, misses: u64, connected: bool) -> Self {
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            connected,
        }
    }

    pub fn disconnected() -> Self {
        CacheStats::from_counts(0, 0, false)
    }
}
