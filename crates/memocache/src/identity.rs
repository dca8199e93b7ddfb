//! Identity keys
//!
//! By default a memoized function is keyed on the *value* of its argument.
//! [`ByAddress`] keys on *which allocation* is passed instead: two handles are
//! the same key exactly when they point at the same `Rc`, whatever the pointee
//! currently holds. Mutating the pointee through interior mutability does not
//! change the key, so a later call with the same handle is a hit and returns the
//! result computed before the mutation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

/// Shared handle compared and hashed by address
pub struct ByAddress<T: ?Sized>(Rc<T>);

impl<T> ByAddress<T> {
    /// Allocate `value` and wrap the new handle
    pub fn new(value: T) -> Self {
        Self(Rc::new(value))
    }
}

impl<T: ?Sized> ByAddress<T> {
    /// Wrap an existing handle
    pub fn from_rc(rc: Rc<T>) -> Self {
        Self(rc)
    }

    /// Address used for hashing and equality
    pub fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    /// Borrow the underlying handle
    pub fn as_rc(&self) -> &Rc<T> {
        &self.0
    }

    /// Unwrap into the underlying handle
    pub fn into_rc(self) -> Rc<T> {
        self.0
    }
}

impl<T: ?Sized> Clone for ByAddress<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for ByAddress<T> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<T: ?Sized> Eq for ByAddress<T> {}

impl<T: ?Sized> Hash for ByAddress<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: ?Sized> Deref for ByAddress<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> From<Rc<T>> for ByAddress<T> {
    fn from(rc: Rc<T>) -> Self {
        Self(rc)
    }
}

impl<T: ?Sized> fmt::Debug for ByAddress<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByAddress({:p})", self.addr())
    }
}
