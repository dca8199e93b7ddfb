//! Memoizer: bounded result cache wrapped around a function

use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::error::Result;
use crate::fifo::FifoCache;
use crate::observer::{CacheEvent, CacheObserver};

/// A function together with a cache of its most recently added results
///
/// A capacity of zero or less disables caching: every call goes straight to
/// the function and nothing is stored. Otherwise at most `capacity` distinct
/// keys are kept, and when a new key arrives the one stored first is dropped.
/// Hits do not refresh an entry's position.
///
/// Each `Memoizer` owns its own cache. Calls need `&mut self`, so sharing one
/// across threads requires external synchronization.
pub struct Memoizer<K, V, F, O = ()> {
    /// Wrapped function
    func: F,

    /// `None` when caching is disabled
    cache: Option<FifoCache<K, V>>,

    /// Event hook
    observer: O,
}

impl<K, V, F> Memoizer<K, V, F>
where
    K: Hash + Eq + Clone,
{
    /// Wrap `func` with a cache of `capacity` entries
    ///
    /// # Arguments
    /// * `func` - Deterministic function to memoize
    /// * `capacity` - Maximum number of cached results; `<= 0` disables caching
    pub fn new(func: F, capacity: i64) -> Self {
        Self::with_observer(func, capacity, ())
    }
}

impl<K, V, F, O> Memoizer<K, V, F, O>
where
    K: Hash + Eq + Clone,
    O: CacheObserver<K>,
{
    /// Wrap `func` and report cache events to `observer`
    pub fn with_observer(func: F, capacity: i64, observer: O) -> Self {
        let cache = if capacity > 0 {
            // Saturate on targets where usize is narrower than i64
            let capacity = usize::try_from(capacity).unwrap_or(usize::MAX);
            NonZeroUsize::new(capacity).map(FifoCache::new)
        } else {
            None
        };

        Self {
            func,
            cache,
            observer,
        }
    }

    /// Call the function through the cache
    ///
    /// On a hit the stored result is cloned and the function is not called.
    /// On a miss the function is called exactly once; if the cache is full
    /// the oldest entry is evicted before the new result is stored.
    pub fn call(&mut self, key: K) -> V
    where
        F: FnMut(K) -> V,
        V: Clone,
    {
        if self.cache.is_none() {
            return (self.func)(key);
        }
        if let Some(value) = self.retrieve(&key) {
            return value;
        }

        let value = (self.func)(key.clone());
        self.store(key, value.clone());
        value
    }

    /// Call a fallible function through the cache
    ///
    /// Only `Ok` results are stored. An `Err` is returned untouched and
    /// leaves the cache exactly as it was.
    pub fn try_call<E>(&mut self, key: K) -> std::result::Result<V, E>
    where
        F: FnMut(K) -> std::result::Result<V, E>,
        V: Clone,
    {
        if self.cache.is_none() {
            return (self.func)(key);
        }
        if let Some(value) = self.retrieve(&key) {
            return Ok(value);
        }

        let value = (self.func)(key.clone())?;
        self.store(key, value.clone());
        Ok(value)
    }

    /// Whether results are being cached
    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Maximum number of cached results (0 when disabled)
    pub fn capacity(&self) -> usize {
        self.cache.as_ref().map_or(0, FifoCache::capacity)
    }

    /// Number of cached results
    pub fn len(&self) -> usize {
        self.cache.as_ref().map_or(0, FifoCache::len)
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Peek at a cached result without calling the function or firing events
    pub fn cached(&self, key: &K) -> Option<&V> {
        self.cache.as_ref()?.get(key)
    }

    /// Cached keys in eviction order, oldest first
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.cache.iter().flat_map(|cache| cache.keys())
    }

    /// Cached entries in eviction order, oldest first
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.cache.iter().flat_map(|cache| cache.iter())
    }

    /// Get the attached observer
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Get the attached observer mutably
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Verify internal bookkeeping
    pub fn check_invariants(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.check_invariants(),
            None => Ok(()),
        }
    }

    /// Drop the cache and return the wrapped function
    pub fn into_inner(self) -> F {
        self.func
    }

    fn retrieve(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let value = self.cache.as_ref()?.get(key)?.clone();
        self.observer.on_event(CacheEvent::Retrieved, key);
        Some(value)
    }

    fn store(&mut self, key: K, value: V) {
        let Some(cache) = self.cache.as_mut() else {
            return;
        };

        if let Some(evicted) = cache.insert(key.clone(), value) {
            self.observer.on_event(CacheEvent::Evicted, &evicted);
        }
        self.observer.on_event(CacheEvent::Inserted, &key);
    }
}

/// Wrap `func` in a closure that memoizes its last `capacity` distinct inputs
///
/// Every call to `memoize` creates an independent cache.
pub fn memoize<K, V, F>(func: F, capacity: i64) -> impl FnMut(K) -> V
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: FnMut(K) -> V,
{
    memoize_with(func, capacity, ())
}

/// Like [`memoize`], reporting cache events to `observer`
pub fn memoize_with<K, V, F, O>(func: F, capacity: i64, observer: O) -> impl FnMut(K) -> V
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: FnMut(K) -> V,
    O: CacheObserver<K>,
{
    let mut memo: Memoizer<K, V, F, O> = Memoizer::with_observer(func, capacity, observer);
    move |key| memo.call(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CacheStats;
    use std::cell::Cell;

    fn double(x: i32) -> i32 {
        x * 2
    }

    #[test]
    fn test_memoize_doubling_sequence() {
        let mut events = Vec::new();
        {
            let mut memo = Memoizer::with_observer(double, 2, |event: CacheEvent, key: &i32| {
                events.push((event, *key))
            });

            assert_eq!(memo.call(4), 8);
            assert_eq!(memo.call(4), 8);
            assert_eq!(memo.call(8), 16);
            assert_eq!(memo.call(12), 24);
            assert_eq!(memo.call(4), 8);
            assert_eq!(memo.call(12), 24);

            let entries: Vec<_> = memo.entries().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(entries, vec![(12, 24), (4, 8)]);
            memo.check_invariants().unwrap();
        }

        use CacheEvent::*;
        assert_eq!(
            events,
            vec![
                (Inserted, 4),
                (Retrieved, 4),
                (Inserted, 8),
                (Evicted, 4),
                (Inserted, 12),
                (Evicted, 8),
                (Inserted, 4),
                (Retrieved, 12),
            ]
        );
    }

    #[test]
    fn test_hit_skips_function() {
        let calls = Cell::new(0);
        let mut memo = Memoizer::new(
            |x: u64| {
                calls.set(calls.get() + 1);
                x + 1
            },
            3,
        );

        assert_eq!(memo.call(1), 2);
        assert_eq!(memo.call(1), 2);
        assert_eq!(memo.call(1), 2);
        assert_eq!(calls.get(), 1);

        assert_eq!(memo.call(2), 3);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_hit_does_not_promote() {
        let mut memo = Memoizer::new(|c: char| c.to_ascii_uppercase(), 2);

        memo.call('a');
        memo.call('b');
        memo.call('a');
        memo.call('c');

        assert!(memo.cached(&'a').is_none());
        assert_eq!(memo.cached(&'b'), Some(&'B'));
        let keys: Vec<_> = memo.keys().copied().collect();
        assert_eq!(keys, vec!['b', 'c']);
    }

    #[test]
    fn test_disabled_calls_every_time() {
        for capacity in [0, -1, i64::MIN] {
            let calls = Cell::new(0);
            let mut events = 0;
            {
                let mut memo = Memoizer::with_observer(
                    |x: i32| {
                        calls.set(calls.get() + 1);
                        x
                    },
                    capacity,
                    |_: CacheEvent, _: &i32| events += 1,
                );

                assert!(!memo.is_enabled());
                assert_eq!(memo.call(5), 5);
                assert_eq!(memo.call(5), 5);
                assert_eq!(memo.capacity(), 0);
                assert!(memo.is_empty());
                assert!(memo.keys().next().is_none());
            }
            assert_eq!(calls.get(), 2);
            assert_eq!(events, 0);
        }
    }

    #[test]
    fn test_try_call_error_is_not_cached() {
        let calls = Cell::new(0);
        let mut memo = Memoizer::new(
            |x: i32| {
                calls.set(calls.get() + 1);
                if x < 0 {
                    Err(format!("negative input {}", x))
                } else {
                    Ok(x * 10)
                }
            },
            1,
        );

        assert_eq!(memo.try_call(1), Ok(10));
        assert_eq!(memo.try_call(-3), Err("negative input -3".to_string()));

        // The failed call neither evicted 1 nor stored -3
        assert_eq!(memo.len(), 1);
        assert_eq!(memo.cached(&1), Some(&10));
        assert_eq!(memo.try_call(1), Ok(10));
        assert_eq!(calls.get(), 2);

        assert!(memo.try_call(-3).is_err());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_try_call_disabled_runs_every_time() {
        let calls = Cell::new(0);
        let mut events = 0;
        {
            let mut memo = Memoizer::with_observer(
                |x: i32| {
                    calls.set(calls.get() + 1);
                    if x == 0 {
                        Err("zero")
                    } else {
                        Ok(x)
                    }
                },
                0,
                |_: CacheEvent, _: &i32| events += 1,
            );

            assert_eq!(memo.try_call(7), Ok(7));
            assert_eq!(memo.try_call(7), Ok(7));
            assert_eq!(memo.try_call(0), Err("zero"));
            assert!(memo.is_empty());
        }
        assert_eq!(calls.get(), 3);
        assert_eq!(events, 0);
    }

    #[test]
    fn test_try_call_error_on_full_cache_keeps_oldest() {
        let mut events = Vec::new();
        {
            let mut memo = Memoizer::with_observer(
                |x: i32| if x < 0 { Err(x) } else { Ok(x) },
                2,
                |event: CacheEvent, key: &i32| events.push((event, *key)),
            );

            memo.try_call(1).unwrap();
            memo.try_call(2).unwrap();
            assert_eq!(memo.try_call(-1), Err(-1));

            let keys: Vec<_> = memo.keys().copied().collect();
            assert_eq!(keys, vec![1, 2]);
            memo.check_invariants().unwrap();
        }
        assert!(!events.iter().any(|(event, _)| *event == CacheEvent::Evicted));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_stats_observer() {
        let mut memo = Memoizer::with_observer(double, 1, CacheStats::new());

        memo.call(1);
        memo.call(1);
        memo.call(2);

        let stats = memo.observer();
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 2);
        assert_eq!(stats.evictions(), 1);

        memo.observer_mut().reset();
        assert_eq!(memo.observer().hits(), 0);
    }

    #[test]
    fn test_memoize_closure_form() {
        let calls = Cell::new(0);
        let mut square = memoize(
            |x: i64| {
                calls.set(calls.get() + 1);
                x * x
            },
            4,
        );

        assert_eq!(square(3), 9);
        assert_eq!(square(3), 9);
        assert_eq!(square(-3), 9);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_independent_instances() {
        let mut a = Memoizer::new(double, 2);
        let mut b = Memoizer::new(double, 2);

        a.call(1);
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
        b.call(2);
        assert!(a.cached(&2).is_none());
    }

    #[test]
    fn test_large_capacity() {
        let mut memo = Memoizer::new(double, i64::MAX);
        assert!(memo.is_enabled());
        assert_eq!(memo.call(3), 6);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_into_inner() {
        let memo = Memoizer::<i32, i32, _>::new(double, 2);
        let f = memo.into_inner();
        assert_eq!(f(21), 42);
    }
}
