use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::config::{CacheConfig, ConfigError};
use super::map::{CacheMetrics, TtlCacheMap};
use crate::clock::{Clock, SystemClock};

/// Cloneable, coarse-locked handle over a [`TtlCacheMap`].
///
/// One mutex guards the whole store for the duration of each operation,
/// expiration sweep included, so no caller ever observes a partially applied
/// sweep. Returned values are owned clones; the lock is released before an
/// operation returns.
pub struct SharedTtlCacheMap<K, V, C = SystemClock>
where
    K: Eq + Hash,
    C: Clock,
{
    inner: Arc<Mutex<TtlCacheMap<K, V, C>>>,
}

impl<K, V, C> Clone for SharedTtlCacheMap<K, V, C>
where
    K: Eq + Hash,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedTtlCacheMap<K, V, SystemClock>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::from_map(TtlCacheMap::new())
    }

    pub fn with_config(config: CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_map(TtlCacheMap::with_config(config)?))
    }
}

impl<K, V> Default for SharedTtlCacheMap<K, V, SystemClock>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> SharedTtlCacheMap<K, V, C>
where
    K: Eq + Hash,
    C: Clock,
{
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self, ConfigError> {
        Ok(Self::from_map(TtlCacheMap::with_clock(config, clock)?))
    }

    fn from_map(map: TtlCacheMap<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    // A poisoned lock is recovered rather than propagated: the map holds no
    // invariant a panicking caller can leave half-applied that the next
    // sweep will not repair.
    fn lock(&self) -> MutexGuard<'_, TtlCacheMap<K, V, C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_time_to_live(&self, ttl: Duration) {
        self.lock().set_time_to_live(ttl);
    }

    pub fn time_to_live(&self) -> Duration {
        self.lock().time_to_live()
    }

    pub fn put(&self, key: K, value: impl Into<Option<V>>) -> Option<V> {
        self.lock().put(key, value)
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.lock().get(key).cloned()
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.lock().remove(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.lock().contains_value(value)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn purge_expired(&self) {
        self.lock().purge_expired();
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.lock().metrics()
    }
}
