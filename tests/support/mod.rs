#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::oneshot;
use uuid::Uuid;

use hitcount::application::cache::{CacheError, KeyValueCache};
use hitcount::application::counter::{CounterConfig, CounterService};
use hitcount::application::health::{PingError, Pingable};
use hitcount::application::repos::{CounterRepo, RepoError, UsersRepo};
use hitcount::cache::MemoryCache;
use hitcount::domain::entities::{UserRecord, VISITOR_COUNT_ID, VisitorCount};
use hitcount::domain::users::NewUser;

/// Counter store backed by an atomic; `None` models a missing row.
pub struct MemoryCounterRepo {
    count: AtomicI64,
    seeded: AtomicBool,
    available: AtomicBool,
    fail_increment: AtomicBool,
    load_gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

/// Handle for a `load_count` call parked after it has read the count.
pub struct LoadGate {
    pub loaded: oneshot::Receiver<()>,
    pub release: oneshot::Sender<()>,
}

impl MemoryCounterRepo {
    pub fn starting_at(count: i64) -> Self {
        Self {
            count: AtomicI64::new(count),
            seeded: AtomicBool::new(true),
            available: AtomicBool::new(true),
            fail_increment: AtomicBool::new(false),
            load_gate: Mutex::new(None),
        }
    }

    pub fn unseeded() -> Self {
        let repo = Self::starting_at(0);
        repo.seeded.store(false, Ordering::SeqCst);
        repo
    }

    pub fn count(&self) -> i64 {
        self.count.load(Ordering::SeqCst)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Park the next `load_count` after it reads the count until released.
    pub fn gate_next_load(&self) -> LoadGate {
        let (loaded_tx, loaded_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        *self.load_gate.lock().unwrap() = Some((loaded_tx, release_rx));
        LoadGate {
            loaded: loaded_rx,
            release: release_tx,
        }
    }

    pub fn fail_increments(&self) {
        self.fail_increment.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepoError::from_persistence("connection refused"))
        }
    }
}

#[async_trait]
impl CounterRepo for MemoryCounterRepo {
    async fn load_count(&self) -> Result<Option<VisitorCount>, RepoError> {
        self.check()?;
        if !self.seeded.load(Ordering::SeqCst) {
            return Ok(None);
        }
        // Widen the read/increment window so concurrent callers interleave.
        tokio::task::yield_now().await;
        let count = self.count();

        let gate = self.load_gate.lock().unwrap().take();
        if let Some((loaded, release)) = gate {
            let _ = loaded.send(());
            let _ = release.await;
        }

        Ok(Some(VisitorCount {
            id: VISITOR_COUNT_ID,
            count,
            updated_at: OffsetDateTime::now_utc(),
        }))
    }

    async fn increment_count(&self) -> Result<(), RepoError> {
        self.check()?;
        if self.fail_increment.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("write failed"));
        }
        if self.seeded.load(Ordering::SeqCst) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn seed_count(&self) -> Result<(), RepoError> {
        self.check()?;
        self.seeded.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp {
    Get(String),
    SetEx(String, String, Duration),
    Delete(String),
}

/// Wraps [`MemoryCache`], recording every command and optionally failing all of them.
#[derive(Default)]
pub struct RecordingCache {
    inner: MemoryCache,
    ops: Mutex<Vec<CacheOp>>,
    down: AtomicBool,
}

impl RecordingCache {
    pub fn ops(&self) -> Vec<CacheOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner
            .get(key)
            .await
            .expect("memory cache accepts reads")
            .is_some()
    }

    pub async fn prime(&self, key: &str, value: &str) {
        self.inner
            .set_ex(key, value, Duration::from_secs(60))
            .await
            .expect("memory cache accepts writes");
    }

    fn record(&self, op: CacheOp) -> Result<(), CacheError> {
        self.ops.lock().unwrap().push(op);
        if self.down.load(Ordering::SeqCst) {
            Err(CacheError::unavailable("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueCache for RecordingCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.record(CacheOp::Get(key.to_string()))?;
        self.inner.get(key).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.record(CacheOp::SetEx(key.to_string(), value.to_string(), ttl))?;
        self.inner.set_ex(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.record(CacheOp::Delete(key.to_string()))?;
        self.inner.delete(key).await
    }
}

#[async_trait]
impl Pingable for RecordingCache {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn ping(&self) -> Result<(), PingError> {
        if self.down.load(Ordering::SeqCst) {
            Err(PingError::new("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Pingable for MemoryCounterRepo {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn ping(&self) -> Result<(), PingError> {
        self.check().map_err(PingError::new)
    }
}

#[derive(Default)]
pub struct MemoryUsersRepo {
    users: Mutex<Vec<UserRecord>>,
}

#[async_trait]
impl UsersRepo for MemoryUsersRepo {
    async fn list_users(&self, limit: u32) -> Result<Vec<UserRecord>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Duplicate {
                constraint: "users_username_key".to_string(),
            });
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".to_string(),
            });
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(record.clone());
        Ok(record)
    }
}

pub fn counter_service(
    repo: Arc<MemoryCounterRepo>,
    cache: Arc<RecordingCache>,
) -> CounterService {
    CounterService::new(repo, cache, CounterConfig::default())
}
