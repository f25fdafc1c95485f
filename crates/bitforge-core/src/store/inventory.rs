// ── Per-workspace remote inventory ──
//
// Caches the result of listing a workspace's entities so reads within one
// process lifetime do not re-list. Each workspace has its own lock; the
// outer `DashMap` only hands out `Arc`s to those locks and is never held
// across an `.await`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Entities of one workspace plus whether they were ever listed.
///
/// `warmed` is tracked explicitly: a workspace that legitimately holds
/// zero entities stays warm and is not re-listed on every read.
struct WorkspaceInventory<T> {
    warmed: bool,
    entries: HashMap<String, T>,
}

impl<T> Default for WorkspaceInventory<T> {
    fn default() -> Self {
        Self {
            warmed: false,
            entries: HashMap::new(),
        }
    }
}

type Slot<T> = Arc<RwLock<WorkspaceInventory<T>>>;

/// Concurrency-safe `workspace -> (key -> entity)` cache.
///
/// Writes are reflected only into workspaces that are already warm;
/// removals apply unconditionally. Operations on different workspaces
/// never contend.
pub(crate) struct InventoryCache<T> {
    workspaces: DashMap<String, Slot<T>>,
}

impl<T: Clone + Send + Sync> InventoryCache<T> {
    pub(crate) fn new() -> Self {
        Self {
            workspaces: DashMap::new(),
        }
    }

    fn slot(&self, workspace: &str) -> Slot<T> {
        Arc::clone(self.workspaces.entry(workspace.to_owned()).or_default().value())
    }

    fn existing_slot(&self, workspace: &str) -> Option<Slot<T>> {
        self.workspaces.get(workspace).map(|r| Arc::clone(r.value()))
    }

    /// Cache-only lookup; never triggers a listing.
    #[cfg(test)]
    pub(crate) async fn get(&self, workspace: &str, key: &str) -> Option<T> {
        let slot = self.existing_slot(workspace)?;
        let inventory = slot.read().await;
        inventory.entries.get(key).cloned()
    }

    #[cfg(test)]
    pub(crate) async fn is_warm(&self, workspace: &str) -> bool {
        match self.existing_slot(workspace) {
            Some(slot) => slot.read().await.warmed,
            None => false,
        }
    }

    /// Keys currently cached for a workspace, sorted.
    #[cfg(test)]
    pub(crate) async fn keys(&self, workspace: &str) -> Vec<String> {
        let Some(slot) = self.existing_slot(workspace) else {
            return Vec::new();
        };
        let inventory = slot.read().await;
        let mut keys: Vec<String> = inventory.entries.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Replace a workspace's entries wholesale and mark it warm.
    #[cfg(test)]
    pub(crate) async fn warm(&self, workspace: &str, entries: Vec<(String, T)>) {
        let slot = self.slot(workspace);
        let mut inventory = slot.write().await;
        inventory.entries = entries.into_iter().collect();
        inventory.warmed = true;
        info!(workspace, count = inventory.entries.len(), "inventory warmed");
    }

    /// Look up `key`, listing the workspace first if it was never warmed.
    ///
    /// The workspace's write lock is held while `list` runs, so concurrent
    /// readers of a cold workspace trigger exactly one listing and writers
    /// queue behind it instead of being overwritten by a stale listing.
    pub(crate) async fn get_or_warm<F, Fut, E>(
        &self,
        workspace: &str,
        key: &str,
        list: F,
    ) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<(String, T)>, E>>,
    {
        let slot = self.slot(workspace);
        {
            let inventory = slot.read().await;
            if inventory.warmed {
                return Ok(inventory.entries.get(key).cloned());
            }
        }

        let mut inventory = slot.write().await;
        if !inventory.warmed {
            debug!(workspace, "inventory cold, listing");
            inventory.entries = list().await?.into_iter().collect();
            inventory.warmed = true;
            info!(workspace, count = inventory.entries.len(), "inventory warmed");
        }
        Ok(inventory.entries.get(key).cloned())
    }

    /// Write-through after a create/update. Returns `true` if stored.
    pub(crate) async fn put(&self, workspace: &str, key: &str, entity: T) -> bool {
        let Some(slot) = self.existing_slot(workspace) else {
            return false;
        };
        let mut inventory = slot.write().await;
        if !inventory.warmed {
            return false;
        }
        inventory.entries.insert(key.to_owned(), entity);
        true
    }

    /// Drop `key` from a workspace regardless of warm state.
    pub(crate) async fn remove(&self, workspace: &str, key: &str) -> Option<T> {
        let slot = self.existing_slot(workspace)?;
        let mut inventory = slot.write().await;
        inventory.entries.remove(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    fn listing(keys: &[&str]) -> Vec<(String, String)> {
        keys.iter().map(|k| ((*k).to_owned(), format!("entity:{k}"))).collect()
    }

    #[tokio::test]
    async fn cold_workspace_ignores_put() {
        let cache = InventoryCache::<String>::new();
        assert!(!cache.put("acme", "app", "entity:app".into()).await);
        assert!(!cache.is_warm("acme").await);
        assert_eq!(cache.get("acme", "app").await, None);
    }

    #[tokio::test]
    async fn warm_workspace_accepts_put_and_remove() {
        let cache = InventoryCache::<String>::new();
        cache.warm("acme", listing(&["app"])).await;

        assert!(cache.put("acme", "api", "entity:api".into()).await);
        assert_eq!(cache.keys("acme").await, vec!["api", "app"]);

        assert_eq!(cache.remove("acme", "app").await.as_deref(), Some("entity:app"));
        assert_eq!(cache.keys("acme").await, vec!["api"]);
    }

    #[tokio::test]
    async fn remove_on_cold_workspace_is_a_noop() {
        let cache = InventoryCache::<String>::new();
        assert_eq!(cache.remove("acme", "app").await, None);
    }

    #[tokio::test]
    async fn empty_listing_still_counts_as_warm() {
        let cache = InventoryCache::<String>::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let hit = cache
                .get_or_warm("empty", "app", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(Vec::new())
                })
                .await
                .unwrap();
            assert_eq!(hit, None);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_warm("empty").await);
    }

    #[tokio::test]
    async fn failed_listing_leaves_workspace_cold() {
        let cache = InventoryCache::<String>::new();
        let result = cache
            .get_or_warm("acme", "app", || async { Err::<Vec<_>, _>("boom") })
            .await;
        assert_eq!(result, Err("boom"));
        assert!(!cache.is_warm("acme").await);
    }

    #[tokio::test]
    async fn warm_replaces_wholesale() {
        let cache = InventoryCache::<String>::new();
        cache.warm("acme", listing(&["a", "b"])).await;
        cache.warm("acme", listing(&["c"])).await;
        assert_eq!(cache.keys("acme").await, vec!["c"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_puts_are_not_lost() {
        let cache = Arc::new(InventoryCache::<String>::new());
        cache.warm("acme", Vec::new()).await;

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    let key = format!("repo-{i:02}");
                    cache.put("acme", &key, key.clone()).await
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(cache.keys("acme").await.len(), 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_cold_readers_list_once() {
        let cache = Arc::new(InventoryCache::<String>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_warm("acme", "app", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::task::yield_now().await;
                            Ok::<_, ()>(listing(&["app"]))
                        })
                        .await
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().as_deref(), Some("entity:app"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
