//! Page-view counter with a cache-aside read path.
//!
//! The stored count in `visitor_counts` is authoritative. The cache only holds
//! a short-lived copy of the pre-increment total, and every recorded view
//! deletes that copy again so the next request never displays a total older
//! than the last increment. Under sustained traffic this means the cached copy
//! rarely serves a hit; `hitcount_counter_cache_hit_total` makes that visible.

use std::{sync::Arc, time::Duration};

use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CounterSettings;

use super::cache::{CacheError, KeyValueCache};
use super::repos::{CounterRepo, RepoError};

pub const DEFAULT_CACHE_KEY: &str = "page_views_total";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

const SOURCE: &str = "application::counter";

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("counter store unavailable")]
    StoreUnavailable(#[source] RepoError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterConfig {
    pub cache_key: String,
    pub cache_ttl: Duration,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl From<&CounterSettings> for CounterConfig {
    fn from(settings: &CounterSettings) -> Self {
        Self {
            cache_key: settings.cache_key.clone(),
            cache_ttl: settings.cache_ttl,
        }
    }
}

#[derive(Clone)]
pub struct CounterService {
    repo: Arc<dyn CounterRepo>,
    cache: Arc<dyn KeyValueCache>,
    config: CounterConfig,
}

impl CounterService {
    pub fn new(
        repo: Arc<dyn CounterRepo>,
        cache: Arc<dyn KeyValueCache>,
        config: CounterConfig,
    ) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    /// Count one page view and return the total to display for it.
    ///
    /// Cache failures degrade to the store-only path. A store failure aborts
    /// at the failing step and is returned as [`CounterError::StoreUnavailable`].
    pub async fn record_view(&self) -> Result<i64, CounterError> {
        let total = match self.read_cached().await {
            Some(total) => total,
            None => {
                let total = self.load_total().await?;
                self.populate(total).await;
                total
            }
        };

        self.repo
            .increment_count()
            .await
            .map_err(CounterError::StoreUnavailable)?;
        counter!("hitcount_page_views_total").increment(1);

        self.invalidate().await;

        debug!(target: SOURCE, total = total + 1, "recorded page view");
        Ok(total + 1)
    }

    /// Read the current total without counting a view.
    ///
    /// Serves a cached total when present but never writes the cache: only
    /// `record_view` populates it, and it deletes the entry again after the
    /// increment.
    pub async fn current_total(&self) -> Result<i64, CounterError> {
        match self.read_cached().await {
            Some(total) => Ok(total),
            None => self.load_total().await,
        }
    }

    async fn load_total(&self) -> Result<i64, CounterError> {
        Ok(self
            .repo
            .load_count()
            .await
            .map_err(CounterError::StoreUnavailable)?
            .map(|row| row.count)
            .unwrap_or(0))
    }

    async fn populate(&self, total: i64) {
        if let Err(err) = self
            .cache
            .set_ex(
                &self.config.cache_key,
                &total.to_string(),
                self.config.cache_ttl,
            )
            .await
        {
            self.report_cache_error("set_ex", &err);
        }
    }

    async fn read_cached(&self) -> Option<i64> {
        let total = self.parse_cached().await;
        if total.is_some() {
            counter!("hitcount_counter_cache_hit_total").increment(1);
        } else {
            counter!("hitcount_counter_cache_miss_total").increment(1);
        }
        total
    }

    async fn parse_cached(&self) -> Option<i64> {
        let raw = match self.cache.get(&self.config.cache_key).await {
            Ok(raw) => raw?,
            Err(err) => {
                self.report_cache_error("get", &err);
                return None;
            }
        };

        // The displayed total is one more than the cached value.
        match raw.trim().parse::<i64>() {
            Ok(total) if (0..i64::MAX).contains(&total) => Some(total),
            _ => {
                warn!(
                    target: SOURCE,
                    key = %self.config.cache_key,
                    value = %raw,
                    "ignoring unusable cached total"
                );
                None
            }
        }
    }

    async fn invalidate(&self) {
        if let Err(err) = self.cache.delete(&self.config.cache_key).await {
            self.report_cache_error("delete", &err);
        }
    }

    fn report_cache_error(&self, op: &'static str, err: &CacheError) {
        counter!("hitcount_counter_cache_error_total", "op" => op).increment(1);
        warn!(
            target: SOURCE,
            op,
            key = %self.config.cache_key,
            error = %err,
            "cache unavailable, continuing with store"
        );
    }
}
