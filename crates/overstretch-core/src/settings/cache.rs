//! Staleness-bounded snapshot cache shared by every edge effect

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use super::keys::{KeyNamespace, KEY_PACKAGES_CONFIG};
use super::snapshot::ConfigSnapshot;
use super::store::SettingsStore;
use crate::clock::Clock;

/// Default snapshot lifetime
pub const DEFAULT_TTL: Duration = Duration::from_millis(120);

struct Cached {
    read_at_nanos: i64,
    snapshot: Arc<ConfigSnapshot>,
}

/// Reads the store at most once per TTL window unless a refresh is forced
pub struct SettingsCache {
    store: Arc<dyn SettingsStore>,
    namespace: KeyNamespace,
    clock: Arc<dyn Clock>,
    ttl_nanos: i64,
    cached: RwLock<Option<Cached>>,
}

impl SettingsCache {
    pub fn new(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_namespace(store, clock, KeyNamespace::default())
    }

    pub fn with_namespace(
        store: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
        namespace: KeyNamespace,
    ) -> Self {
        Self {
            store,
            namespace,
            clock,
            ttl_nanos: duration_nanos(DEFAULT_TTL),
            cached: RwLock::new(None),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_nanos = duration_nanos(ttl);
        self
    }

    pub fn namespace(&self) -> &KeyNamespace {
        &self.namespace
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Current snapshot; re-reads the store when stale or `force` is set
    pub fn get(&self, force: bool) -> Arc<ConfigSnapshot> {
        let now = self.clock.now_nanos();
        if !force {
            let cached = self.cached.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = cached.as_ref() {
                // A clock that went backwards makes the entry stale
                let age = now - entry.read_at_nanos;
                if (0..self.ttl_nanos).contains(&age) {
                    return Arc::clone(&entry.snapshot);
                }
            }
        }

        let snapshot = Arc::new(ConfigSnapshot::read(self.store.as_ref(), |key| {
            self.namespace.resolve(key)
        }));
        tracing::trace!(forced = force, "Settings snapshot refreshed");

        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(Cached {
            read_at_nanos: now,
            snapshot: Arc::clone(&snapshot),
        });
        snapshot
    }

    /// Drop the cached snapshot so the next read hits the store
    pub fn invalidate(&self) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Raw per-package override list, read straight from the store
    pub fn overrides_raw(&self) -> Option<String> {
        self.store
            .get_string(&self.namespace.resolve(KEY_PACKAGES_CONFIG))
    }
}

fn duration_nanos(d: Duration) -> i64 {
    i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::settings::keys::KEY_STIFFNESS;
    use crate::settings::store::MemoryStore;

    fn fixture() -> (Arc<MemoryStore>, Arc<ManualClock>, SettingsCache) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let cache = SettingsCache::new(store.clone(), clock.clone());
        (store, clock, cache)
    }

    #[test]
    fn test_fresh_snapshot_is_reused() {
        let (store, clock, cache) = fixture();
        let first = cache.get(false);
        store.put_float(KEY_STIFFNESS, 100.0);
        clock.advance(Duration::from_millis(119));
        let second = cache.get(false);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.stiffness, 450.0);
    }

    #[test]
    fn test_stale_snapshot_is_reread() {
        let (store, clock, cache) = fixture();
        cache.get(false);
        store.put_float(KEY_STIFFNESS, 100.0);
        clock.advance(Duration::from_millis(120));
        assert_eq!(cache.get(false).stiffness, 100.0);
    }

    #[test]
    fn test_force_bypasses_ttl() {
        let (store, _clock, cache) = fixture();
        cache.get(false);
        store.put_float(KEY_STIFFNESS, 200.0);
        assert_eq!(cache.get(true).stiffness, 200.0);
        // The forced read restarts the window
        assert_eq!(cache.get(false).stiffness, 200.0);
    }

    #[test]
    fn test_invalidate() {
        let (store, _clock, cache) = fixture();
        cache.get(false);
        store.put_float(KEY_STIFFNESS, 300.0);
        cache.invalidate();
        assert_eq!(cache.get(false).stiffness, 300.0);
    }

    #[test]
    fn test_namespace_applies_to_reads() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(0));
        store.put_float("overscroll_stiffness_pine", 123.0);
        store.put_string("overscroll_packages_config_pine", "a.b:1:2.0");
        let cache = SettingsCache::with_namespace(store, clock, KeyNamespace::new("_pine"));
        assert_eq!(cache.get(false).stiffness, 123.0);
        assert_eq!(cache.overrides_raw().as_deref(), Some("a.b:1:2.0"));
    }

    #[test]
    fn test_clock_going_backwards_rereads() {
        let (store, clock, cache) = fixture();
        clock.set_nanos(1_000_000_000);
        cache.get(false);
        store.put_float(KEY_STIFFNESS, 75.0);
        clock.set_nanos(500_000_000);
        assert_eq!(cache.get(false).stiffness, 75.0);
    }

    #[test]
    fn test_concurrent_reads_and_writes() {
        let (store, clock, cache) = fixture();
        let cache = Arc::new(cache);

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let cache = Arc::clone(&cache);
                let store = Arc::clone(&store);
                let clock = Arc::clone(&clock);
                scope.spawn(move || {
                    for i in 0..200 {
                        if worker == 0 {
                            store.put_float(KEY_STIFFNESS, 100.0 + i as f32);
                            clock.advance(Duration::from_millis(1));
                        }
                        let snapshot = cache.get(i % 10 == 0);
                        assert!(snapshot.stiffness >= 100.0);
                    }
                });
            }
        });

        store.put_float(KEY_STIFFNESS, 42.0);
        assert_eq!(cache.get(true).stiffness, 42.0);
    }

    #[test]
    fn test_custom_ttl() {
        let (store, clock, cache) = fixture();
        let cache = cache.with_ttl(Duration::from_millis(10));
        cache.get(false);
        store.put_float(KEY_STIFFNESS, 50.0);
        clock.advance(Duration::from_millis(10));
        assert_eq!(cache.get(false).stiffness, 50.0);
    }
}
