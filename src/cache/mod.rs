//! Cache backends for the counter read path.
//!
//! - **Redis**: used when `cache.redis_url` is configured.
//! - **Memory**: an in-process expiring map, used otherwise.
//!
//! ```toml
//! [cache]
//! redis_url = "redis://127.0.0.1:6379/"
//! timeout_ms = 500
//! ```

mod lock;
mod redis;
mod store;

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::{cache::KeyValueCache, health::Pingable};
use crate::config::CacheSettings;
use crate::infra::error::InfraError;

pub use self::redis::RedisCache;
pub use store::MemoryCache;

#[derive(Clone)]
pub enum CacheBackend {
    Memory(Arc<MemoryCache>),
    Redis(Arc<RedisCache>),
}

impl CacheBackend {
    /// Build the configured backend and probe it once.
    ///
    /// An unreachable Redis only logs a warning: the counter keeps serving
    /// from the database until the cache comes back.
    pub async fn connect(settings: &CacheSettings) -> Result<Self, InfraError> {
        let Some(url) = settings.redis_url.as_deref() else {
            info!(target: "hitcount::cache", "using in-process cache");
            return Ok(Self::Memory(Arc::new(MemoryCache::new())));
        };

        let cache = RedisCache::open(url, settings.timeout)
            .map_err(|err| InfraError::cache(err.to_string()))?;
        if let Err(err) = cache.ping().await {
            warn!(
                target: "hitcount::cache",
                error = %err,
                "redis unreachable at startup, continuing without cache"
            );
        }
        Ok(Self::Redis(Arc::new(cache)))
    }

    pub fn store(&self) -> Arc<dyn KeyValueCache> {
        match self {
            Self::Memory(cache) => cache.clone(),
            Self::Redis(cache) => cache.clone(),
        }
    }

    pub fn pingable(&self) -> Arc<dyn Pingable> {
        match self {
            Self::Memory(cache) => cache.clone(),
            Self::Redis(cache) => cache.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
        }
    }
}
