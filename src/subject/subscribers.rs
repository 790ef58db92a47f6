use crate::{
  observer::{BoxedObserver, Observer},
  rc::{MutArc, RcDerefMut, WeakArc},
  subscription::{DynamicSubscriptions, Subscription, SubscriptionFlag},
};

use super::SubjectCore;

/// One registered observer.
///
/// Entries are cheap to clone, so an emission can snapshot the registry,
/// release the registry lock, and deliver without holding it. `closed` is
/// checked before every delivery, which is how an unsubscribe issued from a
/// callback takes effect for the rest of the current emission.
pub(crate) struct ObserverEntry<Item, Err> {
  observer: MutArc<Option<BoxedObserver<Item, Err>>>,
  pub(crate) closed: SubscriptionFlag,
}

impl<Item, Err> Clone for ObserverEntry<Item, Err> {
  fn clone(&self) -> Self { ObserverEntry { observer: self.observer.clone(), closed: self.closed.clone() } }
}

impl<Item, Err> ObserverEntry<Item, Err> {
  pub(crate) fn new(observer: BoxedObserver<Item, Err>) -> Self {
    ObserverEntry { observer: MutArc::own(Some(observer)), closed: SubscriptionFlag::default() }
  }

  /// Deliver `value`. Returns `false` once this entry will never accept
  /// another value.
  pub(crate) fn next(&self, value: Item) -> bool {
    if self.closed.is_set() {
      return false;
    }
    let mut observer = self.observer.rc_deref_mut();
    match observer.as_mut() {
      Some(o) => {
        o.next(value);
        if o.is_finished() {
          self.closed.set();
          return false;
        }
        true
      }
      None => false,
    }
  }

  pub(crate) fn error(&self, err: Err) {
    if let Some(observer) = self.take() {
      observer.error(err);
    }
  }

  pub(crate) fn complete(&self) {
    if let Some(observer) = self.take() {
      observer.complete();
    }
  }

  pub(crate) fn is_closed(&self) -> bool { self.closed.is_set() }

  fn take(&self) -> Option<BoxedObserver<Item, Err>> {
    if !self.closed.set() {
      return None;
    }
    let observer = self.observer.rc_deref_mut().take();
    observer
  }
}

/// The insertion-ordered observer registry of a subject.
pub(crate) struct Subscribers<Item, Err> {
  inner: DynamicSubscriptions<ObserverEntry<Item, Err>>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Subscribers { inner: DynamicSubscriptions::default() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  pub(crate) fn add(&mut self, entry: ObserverEntry<Item, Err>) -> usize { self.inner.add(entry) }

  pub(crate) fn remove(&mut self, id: usize) -> Option<ObserverEntry<Item, Err>> { self.inner.remove(id) }

  pub(crate) fn snapshot(&self) -> Vec<ObserverEntry<Item, Err>> { self.inner.iter().cloned().collect() }

  pub(crate) fn drain(&mut self) -> Vec<ObserverEntry<Item, Err>> { self.inner.drain().collect() }

  pub(crate) fn prune(&mut self) { self.inner.retain(|entry| !entry.is_closed()); }

  pub(crate) fn len(&self) -> usize { self.inner.len() }
}

/// The subscription a subject hands out.
///
/// Holds the subject weakly: a subscription kept alive longer than its
/// subject does not keep the subject's observers alive.
pub struct SubjectSubscription<Item, Err, R> {
  core: WeakArc<SubjectCore<Item, Err, R>>,
  id: Option<usize>,
  closed: SubscriptionFlag,
}

impl<Item, Err, R> SubjectSubscription<Item, Err, R> {
  pub(crate) fn new(core: WeakArc<SubjectCore<Item, Err, R>>, id: Option<usize>, closed: SubscriptionFlag) -> Self {
    SubjectSubscription { core, id, closed }
  }
}

impl<Item, Err, R> Subscription for SubjectSubscription<Item, Err, R> {
  fn unsubscribe(self) {
    self.closed.set();
    if let (Some(id), Some(core)) = (self.id, self.core.upgrade()) {
      let removed = core.rc_deref_mut().observers.remove(id);
      drop(removed);
    }
  }

  fn is_closed(&self) -> bool { self.closed.is_set() }
}
