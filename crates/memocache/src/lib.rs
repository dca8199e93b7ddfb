//! # memocache
//!
//! Bounded memoization for pure functions.
//!
//! ## Architecture
//! - **HashMap**: AHash keyed lookup of stored results (O(1))
//! - **Queue**: insertion order, front is the next eviction (O(1))
//! - **Observer**: optional hook told about every insert, eviction and hit
//!
//! Eviction is first-in first-out. Reading a cached result never changes
//! which entry goes next.
//!
//! ```
//! use memocache::Memoizer;
//!
//! let mut double = Memoizer::new(|x: i32| x * 2, 2);
//! assert_eq!(double.call(4), 8);
//! assert_eq!(double.call(8), 16);
//! assert_eq!(double.call(12), 24); // evicts 4
//! assert!(double.cached(&4).is_none());
//! ```
//!
//! Keys compare by value. Wrap an `Rc` in [`ByAddress`] to key on the
//! allocation instead, so that later changes to the pointee are not seen by
//! cached calls.

#![warn(missing_docs)]

mod error;
mod fifo;
mod identity;
mod memoize;
mod observer;
mod stats;

pub use error::{Error, Result};
pub use fifo::FifoCache;
pub use identity::ByAddress;
pub use memoize::{memoize, memoize_with, Memoizer};
pub use observer::{CacheEvent, CacheObserver, TracingObserver};
pub use stats::CacheStats;
