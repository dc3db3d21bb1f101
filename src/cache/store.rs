//! In-process expiring key-value store.
//!
//! Used when no Redis URL is configured and by tests. Expired entries are
//! invisible to readers and are swept on the next write.

use std::{
    collections::HashMap,
    sync::RwLock,
    time::{Duration, Instant},
};

use async_trait::async_trait;

use crate::application::{
    cache::{CacheError, KeyValueCache},
    health::{PingError, Pingable},
};

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        rw_read(&self.entries, SOURCE, "get")
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.lookup(key))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| CacheError::command("SETEX", format!("ttl {ttl:?} out of range")))?;

        let mut entries = rw_write(&self.entries, SOURCE, "set_ex");
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        rw_write(&self.entries, SOURCE, "delete").remove(key);
        Ok(())
    }
}

#[async_trait]
impl Pingable for MemoryCache {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn ping(&self) -> Result<(), PingError> {
        Ok(())
    }
}
