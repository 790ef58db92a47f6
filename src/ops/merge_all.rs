use std::collections::VecDeque;

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  rc::{MutArc, RcDerefMut},
  subscription::{BoxedSubscription, DynamicSubscriptions, ProxySubscription, Subscription, SubscriptionFlag},
  type_hint::TypeHint,
};

/// Flattens an observable of observables.
///
/// At most `concurrent` inner observables are subscribed at a time; the rest
/// wait in arrival order and are subscribed as running ones complete. With
/// `concurrent == 1` the inner observables play one after another.
#[derive(Clone)]
pub struct MergeAllOp<S, Inner> {
  source: S,
  concurrent: usize,
  _hint: TypeHint<Inner>,
}

impl<S, Inner> MergeAllOp<S, Inner> {
  pub(crate) fn new(source: S, concurrent: usize) -> Self {
    MergeAllOp { source, concurrent: concurrent.max(1), _hint: TypeHint::new() }
  }
}

impl<Item, Err, O, S, Inner> Observable<Item, Err, O> for MergeAllOp<S, Inner>
where
  O: Observer<Item, Err>,
  S: Observable<Inner, Err, MergeAllOuterObserver<O, Inner, Item, Err>>,
  S::Unsub: Send + 'static,
  Inner: Observable<Item, Err, MergeAllInnerObserver<O, Inner, Item, Err>>,
  Inner::Unsub: Send + 'static,
{
  type Unsub = MergeAllSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let state = MergeAllState { queue: VecDeque::new(), active: 0, outer_done: false, concurrent: self.concurrent };
    let shared = MergeAllShared {
      downstream: SharedObserver::new(observer, state),
      inners: MutArc::own(DynamicSubscriptions::new()),
      outer: ProxySubscription::default(),
      closed: SubscriptionFlag::default(),
      subscribe: subscribe_inner::<O, Inner, Item, Err>,
    };
    let unsub = self.source.actual_subscribe(MergeAllOuterObserver { shared: shared.clone() });
    shared.outer.set(BoxedSubscription::new(unsub));
    MergeAllSubscription { outer: shared.outer, inners: shared.inners, closed: shared.closed }
  }
}

impl<Item, Err, S, Inner> ObservableExt<Item, Err> for MergeAllOp<S, Inner>
where
  S: ObservableExt<Inner, Err>,
  Inner: ObservableExt<Item, Err>,
{
}

struct MergeAllState<Inner> {
  queue: VecDeque<Inner>,
  active: usize,
  outer_done: bool,
  concurrent: usize,
}

/// Everything the outer and inner observers share.
///
/// `subscribe` is fixed when the operator is subscribed, where the inner
/// observable type is known to accept [`MergeAllInnerObserver`]. Inner
/// observers only call through it, so their own `Observer` impl carries no
/// bound on `Inner`.
struct MergeAllShared<O, Inner, Item, Err> {
  downstream: SharedObserver<O, Item, Err, MergeAllState<Inner>>,
  inners: MutArc<DynamicSubscriptions<BoxedSubscription>>,
  outer: ProxySubscription<BoxedSubscription>,
  closed: SubscriptionFlag,
  subscribe: fn(&MergeAllShared<O, Inner, Item, Err>, Inner),
}

impl<O, Inner, Item, Err> Clone for MergeAllShared<O, Inner, Item, Err> {
  fn clone(&self) -> Self {
    MergeAllShared {
      downstream: self.downstream.clone(),
      inners: self.inners.clone(),
      outer: self.outer.clone(),
      closed: self.closed.clone(),
      subscribe: self.subscribe,
    }
  }
}

impl<O, Inner, Item, Err> MergeAllShared<O, Inner, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn release_all(&self) {
    self.closed.set();
    self.outer.clone().unsubscribe();
    let inners: Vec<_> = self.inners.rc_deref_mut().drain().collect();
    for inner in inners {
      inner.unsubscribe();
    }
  }

  fn fail(&self, err: Err) {
    if self.downstream.error(err) {
      self.release_all();
    }
  }
}

fn subscribe_inner<O, Inner, Item, Err>(shared: &MergeAllShared<O, Inner, Item, Err>, inner: Inner)
where
  O: Observer<Item, Err>,
  Inner: Observable<Item, Err, MergeAllInnerObserver<O, Inner, Item, Err>>,
  Inner::Unsub: Send + 'static,
{
  let id = shared.inners.rc_deref_mut().reserve_id();
  let done = SubscriptionFlag::default();
  let unsub = inner.actual_subscribe(MergeAllInnerObserver { shared: shared.clone(), id, done: done.clone() });

  let rejected = {
    let mut inners = shared.inners.rc_deref_mut();
    if shared.closed.is_set() {
      Some(unsub)
    } else {
      if !done.is_set() {
        inners.insert(id, BoxedSubscription::new(unsub));
      }
      None
    }
  };
  if let Some(unsub) = rejected {
    unsub.unsubscribe();
  }
}

pub struct MergeAllOuterObserver<O, Inner, Item, Err> {
  shared: MergeAllShared<O, Inner, Item, Err>,
}

impl<Item, Err, O, Inner> Observer<Inner, Err> for MergeAllOuterObserver<O, Inner, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, inner: Inner) {
    let ready = self.shared.downstream.update(|outbox| {
      if outbox.is_stopped() {
        return None;
      }
      let state = &mut outbox.state;
      if state.active < state.concurrent {
        state.active += 1;
        Some(inner)
      } else {
        state.queue.push_back(inner);
        tracing::trace!(queued = state.queue.len(), "inner observable queued");
        None
      }
    });
    if let Some(inner) = ready {
      (self.shared.subscribe)(&self.shared, inner);
    }
  }

  fn error(self, err: Err) { self.shared.fail(err) }

  fn complete(self) {
    self.shared.downstream.update(|outbox| {
      outbox.state.outer_done = true;
      if outbox.state.active == 0 {
        outbox.push_complete();
      }
    });
  }

  fn is_finished(&self) -> bool { self.shared.downstream.is_finished() }
}

pub struct MergeAllInnerObserver<O, Inner, Item, Err> {
  shared: MergeAllShared<O, Inner, Item, Err>,
  id: usize,
  done: SubscriptionFlag,
}

impl<Item, Err, O, Inner> Observer<Item, Err> for MergeAllInnerObserver<O, Inner, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.shared.downstream.next(value) }

  fn error(self, err: Err) {
    self.done.set();
    self.shared.fail(err)
  }

  fn complete(self) {
    self.done.set();
    self.shared.inners.rc_deref_mut().remove(self.id);

    let next = self.shared.downstream.update(|outbox| {
      if outbox.is_stopped() {
        return None;
      }
      let state = &mut outbox.state;
      match state.queue.pop_front() {
        Some(next) => Some(next),
        None => {
          state.active -= 1;
          if state.active == 0 && state.outer_done {
            outbox.push_complete();
          }
          None
        }
      }
    });
    if let Some(next) = next {
      (self.shared.subscribe)(&self.shared, next);
    }
  }

  fn is_finished(&self) -> bool { self.shared.downstream.is_finished() }
}

/// Releases the outer source and every running inner observable.
pub struct MergeAllSubscription {
  outer: ProxySubscription<BoxedSubscription>,
  inners: MutArc<DynamicSubscriptions<BoxedSubscription>>,
  closed: SubscriptionFlag,
}

impl Subscription for MergeAllSubscription {
  fn unsubscribe(self) {
    self.closed.set();
    self.outer.unsubscribe();
    let inners: Vec<_> = self.inners.rc_deref_mut().drain().collect();
    for inner in inners {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.closed.is_set() }
}
