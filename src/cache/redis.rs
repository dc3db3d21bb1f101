//! Redis-backed cache.
//!
//! The connection is established lazily so the service can start while Redis
//! is down; a failed connect is retried on the next command.

use std::time::Duration;

use async_trait::async_trait;
use redis::{Client, aio::ConnectionManager};
use tokio::{sync::OnceCell, time::timeout};
use tracing::info;

use crate::application::{
    cache::{CacheError, KeyValueCache},
    health::{PingError, Pingable},
};

pub struct RedisCache {
    client: Client,
    manager: OnceCell<ConnectionManager>,
    timeout: Duration,
}

impl RedisCache {
    /// Parse the URL without connecting.
    pub fn open(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(CacheError::unavailable)?;
        Ok(Self {
            client,
            manager: OnceCell::new(),
            timeout,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                let manager = timeout(
                    self.timeout,
                    ConnectionManager::new(self.client.clone()),
                )
                .await
                .map_err(|_| CacheError::unavailable("timed out connecting to redis"))?
                .map_err(CacheError::unavailable)?;
                info!(target: "hitcount::cache", "redis connection established");
                Ok::<_, CacheError>(manager)
            })
            .await?;
        Ok(manager.clone())
    }

    async fn run<T>(&self, command: &'static str, cmd: &redis::Cmd) -> Result<T, CacheError>
    where
        T: redis::FromRedisValue,
    {
        let mut conn = self.connection().await?;
        timeout(self.timeout, cmd.query_async::<T>(&mut conn))
            .await
            .map_err(|_| CacheError::command(command, "timed out"))?
            .map_err(|err| CacheError::command(command, err))
    }
}

/// Redis `SETEX` rejects a zero TTL; round sub-second values up.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs.max(1)
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.run("GET", redis::cmd("GET").arg(key)).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.run(
            "SETEX",
            redis::cmd("SETEX").arg(key).arg(ttl_seconds(ttl)).arg(value),
        )
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.run::<i64>("DEL", redis::cmd("DEL").arg(key))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl Pingable for RedisCache {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn ping(&self) -> Result<(), PingError> {
        let pong: String = self
            .run("PING", &redis::cmd("PING"))
            .await
            .map_err(PingError::new)?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(PingError::new(format!("unexpected PING reply `{pong}`")))
        }
    }
}
