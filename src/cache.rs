//! Query result cache with typed invalidation.
//!
//! Reads through [`crate::service::Marketplace`] are cached per [`CacheKey`].
//! Every key belongs to one [`CacheTopic`]; a mutation invalidates the topics it
//! affects instead of reaching into individual entries.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::config::CacheConfig;
use crate::model::EntityQuery;

/// Group of keys invalidated together after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTopic {
    Entities,
    Reviews,
    Votes,
    Verifications,
    Registrations,
}

/// Identity of one cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Entities(EntityQuery),
    Entity(Uuid),
    EntityReviews(Uuid),
    UserReviews(Uuid),
    UserVote { review_id: Uuid, user_id: Uuid },
    PendingVerifications,
    PendingRegistrations,
}

impl CacheKey {
    pub fn topic(&self) -> CacheTopic {
        match self {
            CacheKey::Entities(_) | CacheKey::Entity(_) => CacheTopic::Entities,
            CacheKey::EntityReviews(_) | CacheKey::UserReviews(_) => CacheTopic::Reviews,
            CacheKey::UserVote { .. } => CacheTopic::Votes,
            CacheKey::PendingVerifications => CacheTopic::Verifications,
            CacheKey::PendingRegistrations => CacheTopic::Registrations,
        }
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    stored_at: Instant,
}

/// In-memory cache of query results.
pub struct QueryCache {
    enabled: bool,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            enabled,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.enabled, Duration::from_secs(config.ttl_secs))
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(false, Duration::ZERO)
    }

    /// Fresh value for `key`, if one is stored with type `T`.
    pub async fn get<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        if !self.enabled {
            return None;
        }

        let mut entries = self.entries.lock().await;
        let expired = match entries.get(key) {
            None => return None,
            Some(entry) => entry.stored_at.elapsed() >= self.ttl,
        };
        if expired {
            entries.remove(key);
            debug!(?key, "Cache entry expired");
            return None;
        }

        entries
            .get(key)
            .and_then(|entry| entry.value.downcast_ref::<T>())
            .cloned()
    }

    pub async fn insert<T>(&self, key: CacheKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        if !self.enabled {
            return;
        }
        let entry = CacheEntry {
            value: Arc::new(value),
            stored_at: Instant::now(),
        };
        let mut entries = self.entries.lock().await;
        let ttl = self.ttl;
        entries.retain(|_, existing| existing.stored_at.elapsed() < ttl);
        entries.insert(key, entry);
    }

    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.lock().await.remove(key).is_some()
    }

    /// Drop every entry under `topic`. Returns how many were removed.
    pub async fn invalidate_topic(&self, topic: CacheTopic) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|key, _| key.topic() != topic);
        let removed = before - entries.len();
        debug!(?topic, removed, "Cache topic invalidated");
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("enabled", &self.enabled)
            .field("ttl", &self.ttl)
            .finish()
    }
}
