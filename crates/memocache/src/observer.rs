//! Cache event hooks
//!
//! A [`Memoizer`](crate::Memoizer) reports what it does with each call through
//! a [`CacheObserver`]. Observers are advisory: the cache behaves the same with
//! or without one attached.

use std::fmt;

use tracing::Level;

/// What happened to a key during a memoized call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEvent {
    /// A freshly computed result was stored
    Inserted,
    /// The oldest entry was dropped to make room
    Evicted,
    /// A stored result was returned without calling the function
    Retrieved,
}

impl CacheEvent {
    /// Lowercase name of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheEvent::Inserted => "inserted",
            CacheEvent::Evicted => "evicted",
            CacheEvent::Retrieved => "retrieved",
        }
    }
}

impl fmt::Display for CacheEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver for cache events, called synchronously from inside a memoized call
pub trait CacheObserver<K> {
    /// Handle one event for `key`
    fn on_event(&mut self, event: CacheEvent, key: &K);
}

impl<K> CacheObserver<K> for () {
    #[inline]
    fn on_event(&mut self, _event: CacheEvent, _key: &K) {}
}

impl<K, F> CacheObserver<K> for F
where
    F: FnMut(CacheEvent, &K),
{
    fn on_event(&mut self, event: CacheEvent, key: &K) {
        self(event, key)
    }
}

impl<K, A, B> CacheObserver<K> for (A, B)
where
    A: CacheObserver<K>,
    B: CacheObserver<K>,
{
    fn on_event(&mut self, event: CacheEvent, key: &K) {
        self.0.on_event(event, key);
        self.1.on_event(event, key);
    }
}

/// Observer that forwards every event to `tracing`
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    level: Level,
}

impl TracingObserver {
    /// Emit events at DEBUG level
    pub fn new() -> Self {
        Self::with_level(Level::DEBUG)
    }

    /// Emit events at the given level
    pub fn with_level(level: Level) -> Self {
        Self { level }
    }

    /// Level events are emitted at
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> CacheObserver<K> for TracingObserver {
    fn on_event(&mut self, event: CacheEvent, key: &K) {
        // `event!` needs a constant level
        let name = event.as_str();
        if self.level == Level::ERROR {
            tracing::error!(event = name, ?key, "cache {}", name);
        } else if self.level == Level::WARN {
            tracing::warn!(event = name, ?key, "cache {}", name);
        } else if self.level == Level::INFO {
            tracing::info!(event = name, ?key, "cache {}", name);
        } else if self.level == Level::DEBUG {
            tracing::debug!(event = name, ?key, "cache {}", name);
        } else {
            tracing::trace!(event = name, ?key, "cache {}", name);
        }
    }
}
