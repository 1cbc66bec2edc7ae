use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use log::{debug, trace};

use super::config::{CacheConfig, ConfigError, DEFAULT_TTL_MS};
use super::entry::CacheEntry;
use crate::clock::{Clock, SystemClock};

/// A key/value map whose entries expire once they outlive a process-wide TTL.
///
/// Expiration is lazy: there is no background task, and every public
/// operation (except `clear` and the TTL accessors) first sweeps the whole
/// store for expired entries, then runs against the cleaned map. The sweep is
/// a full linear pass, which is fine for the small per-process caches this is
/// built for but does not scale to large stores.
///
/// The container is not internally synchronized. The `&mut` receivers on
/// reads encode both the lazy sweep and the single-owner contract; for shared
/// use, wrap it in [`super::shared::SharedTtlCacheMap`].
pub struct TtlCacheMap<K, V, C = SystemClock>
where
    K: Eq + Hash,
    C: Clock,
{
    store: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
    clock: C,
    metrics: CacheMetrics,
}

impl<K, V> TtlCacheMap<K, V, SystemClock>
where
    K: Eq + Hash,
{
    /// Empty map with the default TTL (1000 ms) and the system clock.
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            ttl: Duration::from_millis(DEFAULT_TTL_MS as u64),
            clock: SystemClock,
            metrics: CacheMetrics::default(),
        }
    }

    pub fn with_config(config: CacheConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V> Default for TtlCacheMap<K, V, SystemClock>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TtlCacheMap<K, V, C>
where
    K: Eq + Hash,
    C: Clock,
{
    /// Builds the map against an injected clock so tests can drive time
    /// deterministically.
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self, ConfigError> {
        let ttl = config.validate()?;
        Ok(Self {
            store: HashMap::new(),
            ttl,
            clock,
            metrics: CacheMetrics::default(),
        })
    }

    /// Changes the TTL for all future expiration checks. Existing entries
    /// keep their insertion timestamps and are re-judged against the new TTL
    /// on the next sweep.
    pub fn set_time_to_live(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    pub fn time_to_live(&self) -> Duration {
        self.ttl
    }

    /// Inserts or replaces the entry for `key`, returning whatever value
    /// previously occupied the slot.
    ///
    /// Passing `None` over a live value acts as a tombstone: the key is
    /// deleted and the old value handed back. In every other case the entry
    /// is stored with a fresh timestamp, `None` included, so an empty
    /// placeholder can occupy a fresh key. The returned `None` does not
    /// distinguish "key was absent" from "previous entry held a placeholder".
    pub fn put(&mut self, key: K, value: impl Into<Option<V>>) -> Option<V> {
        let value = value.into();
        if value.is_none() && self.live_value(&key).is_some() {
            trace!("put of empty value over a live entry, removing");
            return self.remove(&key);
        }
        self.purge_expired();
        let entry = CacheEntry::new(value, self.clock.now());
        self.store.insert(key, entry).and_then(CacheEntry::into_value)
    }

    /// Current value for `key`, or `None` if the key is absent, expired, or
    /// holds a placeholder.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.purge_expired();
        let value = self.store.get(key).and_then(CacheEntry::value);
        if value.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        value
    }

    /// Deletes the entry for `key`, returning its value if one was live.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.purge_expired();
        self.store.remove(key).and_then(CacheEntry::into_value)
    }

    pub fn contains_key(&mut self, key: &K) -> bool {
        self.purge_expired();
        self.store.contains_key(key)
    }

    /// True if any live entry's value equals `value`. Full O(n) scan;
    /// comparison goes through the entry wrapper, which forwards to the
    /// stored value.
    pub fn contains_value(&mut self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.purge_expired();
        self.store.values().any(|entry| entry == value)
    }

    pub fn is_empty(&mut self) -> bool {
        self.purge_expired();
        self.store.is_empty()
    }

    /// Number of live entries, placeholders included.
    pub fn len(&mut self) -> usize {
        self.purge_expired();
        self.store.len()
    }

    /// Unconditionally empties the store. No sweep needed.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Drops every entry whose age has reached the TTL. Runs ahead of each
    /// public operation; the clock is sampled per entry, not once per pass,
    /// so a TTL boundary crossed mid-sweep is still honored.
    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        let clock = &self.clock;
        let before = self.store.len();
        self.store
            .retain(|_, entry| !entry.is_expired(clock.now(), ttl));
        let purged = before - self.store.len();
        if purged > 0 {
            self.metrics.record_expirations(purged);
            debug!("sweep dropped {} expired entries", purged);
        }
    }

    /// Snapshot of hit/miss/expiration counters.
    pub fn metrics(&self) -> CacheMetrics {
        self.metrics
    }

    fn live_value(&self, key: &K) -> Option<&V> {
        let now = self.clock.now();
        self.store
            .get(key)
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .and_then(|entry| entry.value())
    }
}

/// Counters for cache effectiveness, updated by `get` and the sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetrics {
    hits: u64,
    misses: u64,
    expirations: u64,
}

impl CacheMetrics {
    fn record_hit(&mut self) {
        self.hits += 1;
    }

    fn record_miss(&mut self) {
        self.misses += 1;
    }

    fn record_expirations(&mut self, n: usize) {
        self.expirations += n as u64;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn expirations(&self) -> u64 {
        self.expirations
    }

    pub fn report(&self) -> String {
        format!(
            "Hits: {}, Misses: {}, Expirations: {}",
            self.hits, self.misses, self.expirations
        )
    }
}
