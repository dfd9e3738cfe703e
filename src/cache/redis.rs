use crate::cache::{CacheStats, CatalogCache, CATALOG_CACHE_KEY};
use crate::error::{AppError, Result};
use crate::models::Exercise;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Redis-backed catalog cache. `ConnectionManager` is `Arc`-based internally,
/// so cloning it per call is cheap.
pub struct RedisCatalogCache {
    connection: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisCatalogCache {
    pub async fn new(redis_url: &str, ttl_seconds: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::Cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(RedisCatalogCache {
            connection,
            ttl_seconds,
        })
    }
}

#[async_trait]
impl CatalogCache for RedisCatalogCache {
    async fn get_catalog(&self) -> Option<Vec<Exercise>> {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<Option<String>> = conn.get(CATALOG_CACHE_KEY).await;

        match result {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(exercises) => {
                    tracing::debug!("Cache hit for catalog: {}", CATALOG_CACHE_KEY);
                    Some(exercises)
                }
                Err(e) => {
                    tracing::warn!("Failed to deserialize cached catalog: {}", e);
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("Cache miss for catalog: {}", CATALOG_CACHE_KEY);
                None
            }
            Err(e) => {
                tracing::warn!("Redis error getting catalog: {}", e);
                None
            }
        }
    }

    async fn cache_catalog(&self, exercises: &[Exercise]) {
        let json = match serde_json::to_string(exercises) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize catalog for cache: {}", e);
                return;
            }
        };

        let mut conn = self.connection.clone();
        let result: redis::RedisResult<()> =
            conn.set_ex(CATALOG_CACHE_KEY, json, self.ttl_seconds).await;

        match result {
            Ok(()) => {
                tracing::debug!(
                    "Cached {} exercises with TTL {}s: {}",
                    exercises.len(),
                    self.ttl_seconds,
                    CATALOG_CACHE_KEY
                );
            }
            Err(e) => {
                tracing::warn!("Failed to cache catalog: {}", e);
            }
        }
    }

    async fn invalidate(&self) {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<()> = conn.del(CATALOG_CACHE_KEY).await;
        if let Err(e) = result {
            tracing::warn!("Failed to invalidate cached catalog: {}", e);
        }
    }

    async fn get_stats(&self) -> CacheStats {
        let mut conn = self.connection.clone();
        let info: redis::RedisResult<String> =
            redis::cmd("INFO").arg("stats").query_async(&mut conn).await;

        match info {
            Ok(info_str) => CacheStats::from_counts(
                parse_info_value(&info_str, "keyspace_hits"),
                parse_info_value(&info_str, "keyspace_misses"),
                true,
            ),
            Err(_) => CacheStats::disconnected(),
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

fn parse_info_value(info: &str, key: &str) -> u64 {
    info.lines()
        .find(|line| line.starts_with(key))
        .and_then(|line| line.split(':').nth(1))
        .and_then(|val| val.trim().parse().ok())
        .unwrap_or(0)
}
