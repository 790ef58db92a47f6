use crate::{
  observable::{Observable, ObservableExt},
  observer::{BoxedObserver, Observer},
  rc::{MutArc, RcDeref, RcDerefMut},
  subscription::{BoxedSubscription, ProxySubscription, Subscription, SubscriptionFlag},
  type_hint::TypeHint,
};

/// The push handle handed to a [`create`] body.
///
/// Cloneable and `Send`, so it can be kept and fed later, from any thread.
/// Once a terminal signal went out, or the subscription was disposed, every
/// call is a no-op.
pub struct Emitter<Item, Err> {
  observer: MutArc<Option<BoxedObserver<Item, Err>>>,
  closed: SubscriptionFlag,
  teardown: ProxySubscription<BoxedSubscription>,
}

impl<Item, Err> Clone for Emitter<Item, Err> {
  fn clone(&self) -> Self {
    Emitter {
      observer: self.observer.clone(),
      closed: self.closed.clone(),
      teardown: self.teardown.clone(),
    }
  }
}

impl<Item, Err> Emitter<Item, Err> {
  /// Deliver `value`. If the observer reports itself finished afterwards,
  /// the subscription ends here and the teardown runs.
  pub fn next(&self, value: Item) {
    if self.closed.is_set() {
      return;
    }
    let finished = match self.observer.rc_deref_mut().as_mut() {
      Some(observer) => {
        observer.next(value);
        observer.is_finished()
      }
      None => false,
    };
    if finished && self.finish().is_some() {
      self.teardown.clone().unsubscribe();
    }
  }

  pub fn error(&self, err: Err) {
    if let Some(observer) = self.finish() {
      observer.error(err);
    }
    self.teardown.clone().unsubscribe();
  }

  pub fn complete(&self) {
    if let Some(observer) = self.finish() {
      observer.complete();
    }
    self.teardown.clone().unsubscribe();
  }

  /// `true` once nothing emitted from here will be observed.
  pub fn is_closed(&self) -> bool {
    self.closed.is_set()
      || self
        .observer
        .rc_deref()
        .as_ref()
        .map_or(true, |observer| observer.is_finished())
  }

  fn finish(&self) -> Option<BoxedObserver<Item, Err>> {
    if !self.closed.set() {
      return None;
    }
    let observer = self.observer.rc_deref_mut().take();
    observer
  }
}

/// An observable driven by a closure. See [`create`].
#[derive(Clone)]
pub struct Create<F, Item, Err, U> {
  func: F,
  _hint: TypeHint<(Item, Err, U)>,
}

/// Build an observable from a closure.
///
/// `func` runs once per subscription with an [`Emitter`] and returns the
/// teardown to run when the subscription ends, by terminal signal or by
/// unsubscribe. The teardown runs exactly once.
pub fn create<F, Item, Err, U>(func: F) -> Create<F, Item, Err, U>
where
  F: FnOnce(Emitter<Item, Err>) -> U,
  U: Subscription,
{
  Create { func, _hint: TypeHint::new() }
}

pub struct CreateSubscription {
  closed: SubscriptionFlag,
  teardown: ProxySubscription<BoxedSubscription>,
}

impl Subscription for CreateSubscription {
  fn unsubscribe(self) {
    self.closed.set();
    self.teardown.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.closed.is_set() }
}

impl<F, Item, Err, U, O> Observable<Item, Err, O> for Create<F, Item, Err, U>
where
  F: FnOnce(Emitter<Item, Err>) -> U,
  U: Subscription + Send + 'static,
  O: Observer<Item, Err> + Send + 'static,
{
  type Unsub = CreateSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let emitter = Emitter {
      observer: MutArc::own(Some(Box::new(observer) as BoxedObserver<Item, Err>)),
      closed: SubscriptionFlag::default(),
      teardown: ProxySubscription::default(),
    };
    let closed = emitter.closed.clone();
    let teardown = emitter.teardown.clone();
    let unsub = (self.func)(emitter);
    teardown.set(BoxedSubscription::new(unsub));
    CreateSubscription { closed, teardown }
  }
}

impl<F, Item, Err, U> ObservableExt<Item, Err> for Create<F, Item, Err, U> where
  F: FnOnce(Emitter<Item, Err>) -> U
{
}
