//! Shared mutable cells used by subjects and multi-source operators.
//!
//! Every piece of state that more than one observer touches lives behind a
//! [`MutArc`], so two threads feeding the same operator can never interleave a
//! partial state transition.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub trait RcDeref {
  type Target;
  fn rc_deref(&self) -> MutexGuard<'_, Self::Target>;
}

pub trait RcDerefMut: RcDeref {
  fn rc_deref_mut(&self) -> MutexGuard<'_, Self::Target>;
}

/// `Arc<Mutex<T>>` with poison recovery.
///
/// A panic inside a user callback must not wedge every other subscriber of
/// the same stream, so a poisoned lock is entered anyway.
pub struct MutArc<T>(Arc<Mutex<T>>);

/// Non-owning counterpart of [`MutArc`].
pub struct WeakArc<T>(Weak<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  pub fn downgrade(&self) -> WeakArc<T> { WeakArc(Arc::downgrade(&self.0)) }

  /// Returns `true` when both handles point at the same cell.
  pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl<T> WeakArc<T> {
  pub fn upgrade(&self) -> Option<MutArc<T>> { self.0.upgrade().map(MutArc) }
}

impl<T> RcDeref for MutArc<T> {
  type Target = T;

  #[inline]
  fn rc_deref(&self) -> MutexGuard<'_, T> { self.0.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl<T> RcDerefMut for MutArc<T> {
  #[inline]
  fn rc_deref_mut(&self) -> MutexGuard<'_, T> { self.rc_deref() }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Default> Default for MutArc<T> {
  fn default() -> Self { Self::own(T::default()) }
}

impl<T> From<T> for MutArc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}
