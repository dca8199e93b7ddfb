//! FIFO (First In, First Out) bounded cache
//!
//! A hash map for lookups plus a queue recording the order in which keys were
//! added. Reads never touch the queue, so eviction always removes the oldest
//! insertion.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::num::NonZeroUsize;

use ahash::{AHashSet, RandomState};

use crate::error::{Error, Result};

/// Upper bound on slots reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 1024;

/// Bounded key-value cache with insertion-order eviction
#[derive(Debug, Clone)]
pub struct FifoCache<K, V> {
    map: HashMap<K, V, RandomState>,
    order: VecDeque<K>,
    capacity: NonZeroUsize,
}

impl<K, V> FifoCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new FIFO cache holding at most `capacity` entries
    pub fn new(capacity: NonZeroUsize) -> Self {
        let reserve = capacity.get().min(PREALLOC_LIMIT);

        Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            order: VecDeque::with_capacity(reserve),
            capacity,
        }
    }

    /// Get a value from the cache without affecting eviction order
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Check whether a key is cached
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert a key-value pair, returning the key evicted to make room
    ///
    /// Replacing the value of a key that is already cached keeps its
    /// original position in the queue and never evicts.
    pub fn insert(&mut self, key: K, value: V) -> Option<K> {
        if let Some(slot) = self.map.get_mut(&key) {
            *slot = value;
            return None;
        }

        let evicted = if self.map.len() >= self.capacity.get() {
            self.evict()
        } else {
            None
        };

        self.order.push_back(key.clone());
        self.map.insert(key, value);
        evicted
    }

    /// Get the current number of cached entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Cached keys, oldest first
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }

    /// Cached entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.map.get_key_value(key))
    }

    /// Verify that the map and the queue describe the same set of keys
    pub fn check_invariants(&self) -> Result<()> {
        if self.map.len() != self.order.len() {
            return Err(Error::invariant(format!(
                "order has {} keys, map has {}",
                self.order.len(),
                self.map.len()
            )));
        }
        if self.map.len() > self.capacity.get() {
            return Err(Error::invariant(format!(
                "{} entries exceed capacity {}",
                self.map.len(),
                self.capacity
            )));
        }

        let mut seen = AHashSet::with_capacity(self.order.len());
        for (pos, key) in self.order.iter().enumerate() {
            if !self.map.contains_key(key) {
                return Err(Error::invariant(format!(
                    "queued key at position {} is not in the map",
                    pos
                )));
            }
            if !seen.insert(key) {
                return Err(Error::invariant(format!(
                    "queued key at position {} appears twice",
                    pos
                )));
            }
        }
        Ok(())
    }

    fn evict(&mut self) -> Option<K> {
        let oldest = self.order.pop_front()?;
        self.map.remove(&oldest);
        Some(oldest)
    }
}
