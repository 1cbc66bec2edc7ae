use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::clock::Timestamp;

/// Pairs a stored value with the time it was inserted.
///
/// Replaced wholesale on overwrite; `inserted_at` is never rewritten in
/// place. `value` is `None` when the slot holds an explicit empty
/// placeholder (see `TtlCacheMap::put`).
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: Option<V>,
    inserted_at: Timestamp,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(value: Option<V>, inserted_at: Timestamp) -> Self {
        Self { value, inserted_at }
    }

    pub(crate) fn inserted_at(&self) -> Timestamp {
        self.inserted_at
    }

    pub(crate) fn age(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.inserted_at)
    }

    /// Expired once its age reaches the TTL; the boundary itself counts.
    pub(crate) fn is_expired(&self, now: Timestamp, ttl: Duration) -> bool {
        u128::from(self.age(now)) >= ttl.as_millis()
    }

    pub(crate) fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub(crate) fn into_value(self) -> Option<V> {
        self.value
    }
}

// Equality and hashing forward to the wrapped value, ignoring the timestamp,
// so value-based lookups behave as if values were stored unwrapped.
impl<V: PartialEq> PartialEq for CacheEntry<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<V: Eq> Eq for CacheEntry<V> {}

impl<V: Hash> Hash for CacheEntry<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<V: PartialEq> PartialEq<V> for CacheEntry<V> {
    fn eq(&self, other: &V) -> bool {
        self.value.as_ref().map_or(false, |v| v == other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_boundary_is_inclusive() {
        let entry = CacheEntry::new(Some(7), 100);
        let ttl = Duration::from_millis(50);

        assert!(!entry.is_expired(149, ttl));
        assert!(entry.is_expired(150, ttl));
        assert!(entry.is_expired(151, ttl));
    }

    #[test]
    fn age_saturates_before_insertion_time() {
        let entry = CacheEntry::new(Some(7), 100);
        assert_eq!(entry.age(40), 0);
        assert!(!entry.is_expired(40, Duration::from_millis(1)));
    }

    #[test]
    fn equality_ignores_timestamp() {
        let a = CacheEntry::new(Some("x"), 0);
        let b = CacheEntry::new(Some("x"), 999);
        assert_eq!(a, b);
    }

    #[test]
    fn equality_against_raw_value() {
        let entry = CacheEntry::new(Some(3), 0);
        assert_eq!(entry, 3);
        assert_ne!(entry, 4);

        let placeholder: CacheEntry<i32> = CacheEntry::new(None, 0);
        assert_ne!(placeholder, 3);
    }
}
