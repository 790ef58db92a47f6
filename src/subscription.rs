//! Subscription trait and the handles built on it.
//!
//! A subscription is the cancellation capability returned by subscribing.
//! `unsubscribe` consumes the handle; handles that can be cloned
//! ([`SubscriptionHandle`], [`ProxySubscription`], [`DisposeBag`] contents)
//! are idempotent, so releasing the same resource twice has no effect.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

mod bag;
mod boxed;
mod dynamic;
mod proxy;
mod tuple;

pub use bag::DisposeBag;
pub use boxed::{BoxedSubscription, IntoBoxedSubscription};
pub use dynamic::DynamicSubscriptions;
pub use proxy::ProxySubscription;
pub use tuple::TupleSubscription;

pub trait Subscription {
  /// Cancel the subscription and release everything it holds.
  fn unsubscribe(self);

  /// Returns `true` once nothing is left to release.
  fn is_closed(&self) -> bool;

  /// Hand this subscription to `bag`, tying its lifetime to the bag's.
  fn disposed_by(self, bag: &DisposeBag)
  where
    Self: Sized + Send + 'static,
  {
    bag.add(self);
  }
}

impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<U: Subscription> Subscription for Option<U> {
  fn unsubscribe(self) {
    if let Some(inner) = self {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, U::is_closed) }
}

/// Runs a closure on unsubscribe.
pub struct ClosureSubscription<F: FnOnce()>(pub F);

impl<F: FnOnce()> Subscription for ClosureSubscription<F> {
  #[inline]
  fn unsubscribe(self) { (self.0)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// A one-way "closed" flag shared by a handle and the observer it guards.
///
/// Setting and reading are lock-free, which is what makes unsubscribing from
/// inside a callback safe.
#[derive(Clone, Default, Debug)]
pub struct SubscriptionFlag(Arc<AtomicBool>);

impl SubscriptionFlag {
  /// Set the flag. Returns `true` only for the call that actually set it.
  #[inline]
  pub fn set(&self) -> bool { !self.0.swap(true, Ordering::AcqRel) }

  #[inline]
  pub fn is_set(&self) -> bool { self.0.load(Ordering::Acquire) }
}

/// The handle returned by the `subscribe*` helpers.
///
/// Cloneable and idempotent: unsubscribing any clone stops delivery to the
/// observer and releases the upstream subscription exactly once.
pub struct SubscriptionHandle<U> {
  closed: SubscriptionFlag,
  source: ProxySubscription<U>,
}

impl<U> SubscriptionHandle<U> {
  pub(crate) fn new(closed: SubscriptionFlag, source: ProxySubscription<U>) -> Self {
    SubscriptionHandle { closed, source }
  }
}

impl<U: Subscription> SubscriptionHandle<U> {
  /// Activates RAII behavior: the returned guard unsubscribes when dropped.
  ///
  /// **Attention:** binding the result to `_` drops it, and with it the
  /// subscription, immediately.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self> { SubscriptionGuard::new(self) }
}

impl<U> Clone for SubscriptionHandle<U> {
  fn clone(&self) -> Self {
    SubscriptionHandle { closed: self.closed.clone(), source: self.source.clone() }
  }
}

impl<U: Subscription> Subscription for SubscriptionHandle<U> {
  fn unsubscribe(self) {
    self.closed.set();
    self.source.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.closed.is_set() }
}

/// Unsubscribes the wrapped subscription when dropped.
#[must_use]
pub struct SubscriptionGuard<U: Subscription>(Option<U>);

impl<U: Subscription> SubscriptionGuard<U> {
  pub fn new(subscription: U) -> Self { SubscriptionGuard(Some(subscription)) }
}

impl<U: Subscription> Drop for SubscriptionGuard<U> {
  fn drop(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe();
    }
  }
}
