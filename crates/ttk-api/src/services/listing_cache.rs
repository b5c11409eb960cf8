//! Per-owner cache of project listings.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use ttk_models::{InMemoryMemo, Memo, Project};

/// Listing cache keyed by owner id. Writers invalidate the owner's entry.
///
/// Readers fill the cache through [`ListingCache::set_if_current`] with the
/// epoch observed before reading the store, so a read that raced a write can
/// never put a stale listing back after the invalidation.
#[derive(Clone)]
pub struct ListingCache {
    memo: Arc<dyn Memo<Vec<Project>>>,
    epoch: Arc<Mutex<u64>>,
}

impl ListingCache {
    pub fn new(memo: Arc<dyn Memo<Vec<Project>>>) -> Self {
        Self {
            memo,
            epoch: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(Arc::new(InMemoryMemo::<Vec<Project>>::with_ttl(ttl)))
    }

    pub async fn get(&self, owner_id: &str) -> Option<Vec<Project>> {
        self.memo.get(owner_id).await
    }

    /// Invalidation counter; take it before reading the store.
    pub async fn epoch(&self) -> u64 {
        *self.epoch.lock().await
    }

    /// Cache a listing read at `epoch`. Skipped (returns `false`) when any
    /// invalidation happened since.
    pub async fn set_if_current(&self, owner_id: &str, epoch: u64, projects: Vec<Project>) -> bool {
        let current = self.epoch.lock().await;
        if *current != epoch {
            return false;
        }
        self.memo.set(owner_id.to_string(), projects).await;
        true
    }

    /// Drop the cached listing of `owner_id`.
    pub async fn invalidate(&self, owner_id: &str) {
        let mut epoch = self.epoch.lock().await;
        *epoch += 1;
        self.memo.invalidate(owner_id).await;
    }
}
