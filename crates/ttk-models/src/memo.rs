//! Injectable memo cache.
//!
//! Pipeline services take an `Arc<dyn Memo<V>>` instead of relying on a
//! hidden process-wide cache, so tests construct (and clear) their own.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Key-value memo keyed by exact string match.
#[async_trait]
pub trait Memo<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Fresh value for `key`, if any.
    async fn get(&self, key: &str) -> Option<V>;

    /// Store a value, replacing any previous one.
    async fn set(&self, key: String, value: V);

    /// Drop a single entry.
    async fn invalidate(&self, key: &str);

    /// Drop every entry.
    async fn clear(&self);
}

/// Default capacity for in-memory memos.
pub const DEFAULT_MEMO_CAPACITY: usize = 1_000;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// In-process memo with optional TTL and bounded capacity.
pub struct InMemoryMemo<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    ttl: Option<Duration>,
    capacity: usize,
}

impl<V> InMemoryMemo<V> {
    /// Memo without expiry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
            capacity: DEFAULT_MEMO_CAPACITY,
        }
    }

    /// Memo whose entries expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::new()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn is_fresh(&self, entry: &Entry<V>, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.duration_since(entry.inserted_at) < ttl,
            None => true,
        }
    }

    /// Remove expired entries, then the oldest ones until below capacity.
    fn evict(&self, entries: &mut HashMap<String, Entry<V>>) {
        let now = Instant::now();
        entries.retain(|_, entry| self.is_fresh(entry, now));

        if entries.len() >= self.capacity {
            let mut by_age: Vec<(String, Instant)> = entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.inserted_at))
                .collect();
            by_age.sort_by_key(|(_, inserted_at)| *inserted_at);

            let to_remove = entries.len() + 1 - self.capacity;
            for (key, _) in by_age.into_iter().take(to_remove) {
                entries.remove(&key);
            }
        }
    }
}

impl<V> Default for InMemoryMemo<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> Memo<V> for InMemoryMemo<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, Instant::now()))
            .map(|entry| entry.value.clone())
    }

    async fn set(&self, key: String, value: V) {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            self.evict(&mut entries);
        }
        entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
