use redis::{aio::ConnectionManager, AsyncCommands};
use serde::{de::DeserializeOwned, Serialize};

/// Thin cache-aside wrapper around Redis
///
/// The cache is best-effort: when Redis is not configured or a command
/// fails, callers see a miss and fall through to the database or the
/// external API. Cache problems are logged, never surfaced to clients.
#[derive(Clone)]
pub struct Cache {
    conn: Option<ConnectionManager>,
}

impl Cache {
    /// Connect to Redis if a URL is configured, otherwise run disabled
    pub async fn connect(redis_url: Option<&str>) -> Self {
        let Some(url) = redis_url else {
            tracing::info!("REDIS_URL not set, cache disabled");
            return Self::disabled();
        };

        let client = match redis::Client::open(url) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Invalid REDIS_URL, cache disabled: {}", e);
                return Self::disabled();
            }
        };

        match ConnectionManager::new(client).await {
            Ok(conn) => {
                tracing::info!("Connected to Redis cache");
                Self { conn: Some(conn) }
            }
            Err(e) => {
                tracing::warn!("Redis unreachable, cache disabled: {}", e);
                Self::disabled()
            }
        }
    }

    /// A cache that always misses
    pub fn disabled() -> Self {
        Self { conn: None }
    }

    /// Fetch and deserialize a cached value, treating any failure as a miss
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone()?;

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Discarding undecodable cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Serialize and store a value with a TTL, ignoring failures
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };

        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to serialize cache entry {}: {}", key, e);
                return;
            }
        };

        let result: redis::RedisResult<()> = redis::cmd("SETEX")
            .arg(key)
            .arg(ttl_secs)
            .arg(raw)
            .query_async(&mut conn)
            .await;

        if let Err(e) = result {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }
    }

    /// Drop a cached entry, ignoring failures
    pub async fn invalidate(&self, key: &str) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };

        if let Err(e) = conn.del::<_, ()>(key).await {
            tracing::warn!("Cache invalidation failed for {}: {}", key, e);
        }
    }
}
