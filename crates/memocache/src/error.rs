//! Error types for memocache

use std::fmt;

/// Result type alias for memocache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache bookkeeping
///
/// Lookups, insertions and evictions cannot fail. Errors raised by a wrapped
/// function are never converted into this type; they reach the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Mapping and insertion order disagree, or the capacity bound is broken
    InvariantViolation(String),
}

impl Error {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Error::InvariantViolation(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvariantViolation(msg) => write!(f, "Cache invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
