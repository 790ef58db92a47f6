//! Observer trait and implementations
//!
//! An observer receives zero or more `next` values followed by at most one
//! terminal signal. The terminal methods consume the observer, so "nothing
//! after `error`/`complete`" holds by construction for every observer that is
//! owned by value.

use crate::subscription::{BoxedSubscription, ProxySubscription, Subscription, SubscriptionFlag};

mod shared;

pub use shared::{Outbox, SharedObserver};

/// The consumer side of a stream.
pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Receive the terminal error. No more values can follow.
  fn error(self, err: Err);

  /// Receive the terminal completion. No more values can follow.
  fn complete(self);

  /// Returns `true` when this observer no longer accepts values.
  ///
  /// Synchronous sources poll this to stop early, e.g. when a downstream
  /// `take` has already completed.
  fn is_finished(&self) -> bool;
}

/// Object-safe mirror of [`Observer`], so observers can be boxed.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_finished(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value) }
  fn box_error(self: Box<Self>, err: Err) { (*self).error(err) }
  fn box_complete(self: Box<Self>) { (*self).complete() }
  fn box_is_finished(&self) -> bool { self.is_finished() }
}

/// A type-erased observer that can cross threads.
pub type BoxedObserver<Item, Err> = Box<dyn DynObserver<Item, Err> + Send>;

impl<Item, Err> Observer<Item, Err> for BoxedObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_finished(&self) -> bool { (**self).box_is_finished() }
}

/// `None` ignores everything, `Some` delegates.
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_finished(&self) -> bool {
    self
      .as_ref()
      .map_or(true, |inner| Observer::<Item, Err>::is_finished(inner))
  }
}

/// The total three-slot observer the subscribe helpers build from closures.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> ObserverAll<N, E, C> {
  #[inline]
  pub fn new(next: N, error: E, complete: C) -> Self { ObserverAll { next, error, complete } }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(self) { (self.complete)(); }

  #[inline]
  fn is_finished(&self) -> bool { false }
}

pub(crate) fn ignore_error<Err>(_: Err) {}

pub(crate) fn ignore_complete() {}

/// The outermost observer of every `subscribe` call.
///
/// Enforces the signal grammar for observers that did not promise it
/// themselves, and stops all delivery once the paired subscription handle is
/// unsubscribed. The check is a flag read, never a lock, so unsubscribing from
/// inside one of the callbacks is safe.
///
/// A terminal signal releases the whole upstream chain through `upstream`,
/// including sources that will never signal again.
pub struct Subscriber<O> {
  observer: Option<O>,
  closed: SubscriptionFlag,
  upstream: ProxySubscription<BoxedSubscription>,
}

impl<O> Subscriber<O> {
  pub fn new(observer: O, closed: SubscriptionFlag, upstream: ProxySubscription<BoxedSubscription>) -> Self {
    Subscriber { observer: Some(observer), closed, upstream }
  }
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.closed.is_set() {
      return;
    }
    if let Some(observer) = self.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(mut self, err: Err) {
    if let (true, Some(observer)) = (self.closed.set(), self.observer.take()) {
      observer.error(err);
    }
    self.upstream.unsubscribe();
  }

  fn complete(mut self) {
    if let (true, Some(observer)) = (self.closed.set(), self.observer.take()) {
      Observer::<Item, Err>::complete(observer);
    }
    self.upstream.unsubscribe();
  }

  fn is_finished(&self) -> bool {
    self.closed.is_set()
      || self
        .observer
        .as_ref()
        .map_or(true, |observer| Observer::<Item, Err>::is_finished(observer))
  }
}
