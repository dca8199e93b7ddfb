//! Cache statistics tracking

use crate::observer::{CacheEvent, CacheObserver};

/// Running totals of what a memoizer's cache did
///
/// Attach as an observer, or as one half of an observer pair, and read the
/// totals back through [`Memoizer::observer`](crate::Memoizer::observer).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    hits: u64,
    misses: u64,
    evictions: u64,
    inserts: u64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Calls that ran the wrapped function and stored its result
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Entries dropped to make room
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Results stored
    pub fn inserts(&self) -> u64 {
        self.inserts
    }

    /// Share of observed calls that were hits (0.0 when nothing was observed)
    pub fn hit_ratio(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    /// Zero every counter
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl<K> CacheObserver<K> for CacheStats {
    fn on_event(&mut self, event: CacheEvent, _key: &K) {
        match event {
            CacheEvent::Retrieved => self.hits += 1,
            // A memoized miss always ends in exactly one insert
            CacheEvent::Inserted => {
                self.misses += 1;
                self.inserts += 1;
            }
            CacheEvent::Evicted => self.evictions += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(stats: &mut CacheStats, events: &[CacheEvent]) {
        for event in events {
            stats.on_event(*event, &0u8);
        }
    }

    #[test]
    fn test_counts_follow_events() {
        use CacheEvent::*;
        let mut stats = CacheStats::new();

        replay(&mut stats, &[Inserted, Retrieved, Evicted, Inserted]);

        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 2);
        assert_eq!(stats.inserts(), 2);
        assert_eq!(stats.evictions(), 1);
        assert_eq!(stats.hit_ratio(), 1.0 / 3.0);
    }

    #[test]
    fn test_empty_ratio_is_zero() {
        assert_eq!(CacheStats::new().hit_ratio(), 0.0);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut stats = CacheStats::new();
        replay(&mut stats, &[CacheEvent::Inserted, CacheEvent::Retrieved]);

        stats.reset();

        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_ratio(), 0.0);
    }
}
