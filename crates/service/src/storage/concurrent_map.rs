use std::{collections::HashMap, fmt};

use parking_lot::RwLock;

/// Generic in-memory key-value map safe for concurrent readers and writers.
///
/// A single `HashMap<String, V>` guarded by a reader-writer lock: any number of
/// `read` calls proceed in parallel, while a `write` takes exclusive access for
/// the duration of the insert. Lock acquisition cannot fail (no poisoning), so
/// neither operation returns a `Result`.
///
/// Values are cloned out on `read`. Store `Arc<T>` when values are large or
/// must be shared; guarding the interior of a shared mutable value is up to
/// the caller.
pub struct ConcurrentMap<V> {
    inner: RwLock<HashMap<String, V>>,
}

impl<V> ConcurrentMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self { inner: RwLock::new(HashMap::new()) }
    }

    /// Insert `value` under `key`, replacing any previous value.
    pub fn write(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut map = self.inner.write();
        map.insert(key, value);
    }

    /// Insert like `write`, but only while fewer than `capacity` keys are
    /// stored. Overwriting an existing key is always allowed. Returns whether
    /// the value was stored.
    pub fn write_within(&self, key: impl Into<String>, value: V, capacity: usize) -> bool {
        let key = key.into();
        let mut map = self.inner.write();
        if map.len() >= capacity && !map.contains_key(&key) {
            return false;
        }
        map.insert(key, value);
        true
    }

    /// Number of distinct keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Whether `key` has ever been written.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }
}

impl<V: Clone> ConcurrentMap<V> {
    /// Value currently stored under `key`, or `None` when it was never written.
    pub fn read(&self, key: &str) -> Option<V> {
        let map = self.inner.read();
        map.get(key).cloned()
    }
}

impl<V> Default for ConcurrentMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ConcurrentMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentMap").field("len", &self.len()).finish()
    }
}
