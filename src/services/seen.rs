use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while tracking seen listings
#[derive(Debug, Error)]
pub enum SeenListingsError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),
}

/// Two-tier record of listings that were already handed to the dispatcher
///
/// L1 is a bounded in-process map with TTL eviction. L2 (Redis, optional)
/// survives restarts, so one-shot runs triggered by cron do not announce the
/// same listing twice.
pub struct SeenListings {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, ()>,
    ttl_secs: u64,
}

impl SeenListings {
    /// Create a tracker backed by Redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, SeenListingsError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(Arc::new(tokio::sync::Mutex::new(redis))),
            ..Self::in_memory(l1_size, ttl_secs)
        })
    }

    /// Create a tracker that only remembers listings for the life of the process
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            redis: None,
            l1_cache,
            ttl_secs,
        }
    }

    /// Whether the listing was already returned by the source
    pub async fn is_seen(&self, slug: &str) -> Result<bool, SeenListingsError> {
        let key = SeenKey::listing(slug);

        if self.l1_cache.contains_key(&key) {
            tracing::trace!("L1 seen hit: {}", key);
            return Ok(true);
        }

        let Some(redis) = &self.redis else {
            return Ok(false);
        };

        let mut conn = redis.lock().await;
        let exists: bool = redis::cmd("EXISTS")
            .arg(&key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        if exists {
            tracing::trace!("L2 seen hit: {}", key);
            self.l1_cache.insert(key, ()).await;
        }

        Ok(exists)
    }

    /// Remember a listing in both tiers
    pub async fn mark_seen(&self, slug: &str) -> Result<(), SeenListingsError> {
        let key = SeenKey::listing(slug);
        self.l1_cache.insert(key.clone(), ()).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("SET")
                .arg(&key)
                .arg(1)
                .arg("EX")
                .arg(self.ttl_secs)
                .query_async(&mut *conn)
                .await?;
        }

        tracing::trace!("Marked seen: {}", key);
        Ok(())
    }

    pub fn is_persistent(&self) -> bool {
        self.redis.is_some()
    }
}

/// Key builder for seen-listing entries
pub struct SeenKey;

impl SeenKey {
    pub fn listing(slug: &str) -> String {
        format!("earn_notify:seen:{}", slug)
    }
}
