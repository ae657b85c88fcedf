//! TTL key-value cache that must never fail a request.
//!
//! Every operation contains its own failures: a broken or unreachable store
//! behaves exactly like an empty one. Callers cannot tell "cache down" from
//! "cache miss", so the gateway keeps serving (slower) while redis is out.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

/// String-valued store with per-entry TTL.
///
/// Implementations swallow backend errors: `get` answers `None` and `set`
/// answers `false` instead of failing.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> bool;
}

/// Redis-backed store over an auto-reconnecting connection manager.
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Establish the long-lived connection. This is the only point where a
    /// redis problem surfaces as an error; callers fall back to [`NoopCache`]
    /// instead of aborting startup.
    pub async fn connect(url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(CONNECT_TIMEOUT)
            .set_response_timeout(RESPONSE_TIMEOUT)
            .set_number_of_retries(1);

        let manager = client.get_connection_manager_with_config(config).await?;
        info!("Connected to redis");

        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.manager.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!(key = %key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis GET failed, treating as a miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> bool {
        let mut conn = self.manager.clone();
        match conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await {
            Ok(()) => {
                debug!(key = %key, ttl_secs = ttl.as_secs(), "Cached value");
                true
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis SET failed, skipping cache write");
                false
            }
        }
    }
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// In-process store with lazy expiry, for tests and cache-less deployments.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        if let Some(entry) = entries.get(key)
            && entry.expires_at > Instant::now()
        {
            return Some(entry.value.clone());
        }
        None
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> bool {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        true
    }
}

/// Store used when no cache backend is available: every read misses and
/// every write is dropped.
pub struct NoopCache;

#[async_trait]
impl CacheStore for NoopCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> bool {
        false
    }
}

/// Typed facade over a [`CacheStore`]: JSON (de)serialization plus the
/// process-wide TTL.
///
/// A present entry that deserializes into the expected type is a hit. An
/// entry that no longer deserializes is treated as a miss and left to age
/// out at its TTL.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl_seconds: u64) -> Self {
        Self {
            store,
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding cached entry that no longer deserializes");
                None
            }
        }
    }

    /// Best-effort write; serialization or store failures only log.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize value for caching");
                return false;
            }
        };

        self.store.set(key, payload, self.ttl).await
    }
}
