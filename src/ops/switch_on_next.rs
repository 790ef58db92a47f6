use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  rc::{MutArc, RcDerefMut},
  subscription::{BoxedSubscription, ProxySubscription, Subscription, SubscriptionFlag},
  type_hint::TypeHint,
};

/// Flattens an observable of observables by following only the most recent
/// inner one. Each new inner observable releases the previous.
///
/// Completes once the outer source and the current inner have both
/// completed. An error from either side terminates the output.
#[derive(Clone)]
pub struct SwitchOnNextOp<S, Inner> {
  source: S,
  _hint: TypeHint<Inner>,
}

impl<S, Inner> SwitchOnNextOp<S, Inner> {
  pub(crate) fn new(source: S) -> Self { SwitchOnNextOp { source, _hint: TypeHint::new() } }
}

impl<Item, Err, O, S, Inner> Observable<Item, Err, O> for SwitchOnNextOp<S, Inner>
where
  O: Observer<Item, Err>,
  S: Observable<Inner, Err, SwitchOuterObserver<O, Item, Err>>,
  S::Unsub: Send + 'static,
{
  type Unsub = SwitchOnNextSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let shared = SwitchShared {
      downstream: SharedObserver::new(observer, SwitchState { active: None, next_id: 0, outer_done: false }),
      outer: ProxySubscription::default(),
      current: MutArc::own(None),
      closed: SubscriptionFlag::default(),
    };
    let unsub = self
      .source
      .actual_subscribe(SwitchOuterObserver { shared: shared.clone() });
    shared.outer.set(BoxedSubscription::new(unsub));
    SwitchOnNextSubscription { outer: shared.outer, current: shared.current, closed: shared.closed }
  }
}

impl<Item, Err, S, Inner> ObservableExt<Item, Err> for SwitchOnNextOp<S, Inner>
where
  S: ObservableExt<Inner, Err>,
  Inner: ObservableExt<Item, Err>,
{
}

struct SwitchState {
  active: Option<usize>,
  next_id: usize,
  outer_done: bool,
}

struct SwitchShared<O, Item, Err> {
  downstream: SharedObserver<O, Item, Err, SwitchState>,
  outer: ProxySubscription<BoxedSubscription>,
  current: MutArc<Option<ProxySubscription<BoxedSubscription>>>,
  closed: SubscriptionFlag,
}

impl<O, Item, Err> Clone for SwitchShared<O, Item, Err> {
  fn clone(&self) -> Self {
    SwitchShared {
      downstream: self.downstream.clone(),
      outer: self.outer.clone(),
      current: self.current.clone(),
      closed: self.closed.clone(),
    }
  }
}

impl<O, Item, Err> SwitchShared<O, Item, Err> {
  fn release_current(&self) {
    let current = self.current.rc_deref_mut().take();
    if let Some(current) = current {
      current.unsubscribe();
    }
  }
}

pub struct SwitchOuterObserver<O, Item, Err> {
  shared: SwitchShared<O, Item, Err>,
}

impl<Item, Err, O, Inner> Observer<Inner, Err> for SwitchOuterObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
  Inner: Observable<Item, Err, SwitchInnerObserver<O, Item, Err>>,
  Inner::Unsub: Send + 'static,
{
  fn next(&mut self, inner: Inner) {
    let id = self.shared.downstream.update(|outbox| {
      if outbox.is_stopped() {
        return None;
      }
      let state = &mut outbox.state;
      let id = state.next_id;
      state.next_id += 1;
      state.active = Some(id);
      Some(id)
    });
    let Some(id) = id else { return };

    let proxy = ProxySubscription::default();
    let previous = {
      let mut current = self.shared.current.rc_deref_mut();
      if self.shared.closed.is_set() {
        return;
      }
      current.replace(proxy.clone())
    };
    if let Some(previous) = previous {
      tracing::trace!(inner = id, "switching to a new inner observable");
      previous.unsubscribe();
    }

    let unsub = inner.actual_subscribe(SwitchInnerObserver { shared: self.shared.clone(), id });
    proxy.set(BoxedSubscription::new(unsub));
  }

  fn error(self, err: Err) {
    if self.shared.downstream.error(err) {
      self.shared.release_current();
    }
  }

  fn complete(self) {
    self.shared.downstream.update(|outbox| {
      outbox.state.outer_done = true;
      if outbox.state.active.is_none() {
        outbox.push_complete();
      }
    });
  }

  fn is_finished(&self) -> bool { self.shared.downstream.is_finished() }
}

pub struct SwitchInnerObserver<O, Item, Err> {
  shared: SwitchShared<O, Item, Err>,
  id: usize,
}

impl<Item, Err, O> Observer<Item, Err> for SwitchInnerObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let id = self.id;
    self.shared.downstream.update(|outbox| {
      if outbox.state.active == Some(id) {
        outbox.push_next(value);
      }
    });
  }

  fn error(self, err: Err) {
    let id = self.id;
    let failed = self
      .shared
      .downstream
      .update(|outbox| outbox.state.active == Some(id) && outbox.push_error(err));
    if failed {
      self.shared.outer.unsubscribe();
    }
  }

  fn complete(self) {
    let id = self.id;
    self.shared.downstream.update(|outbox| {
      if outbox.state.active != Some(id) {
        return;
      }
      outbox.state.active = None;
      if outbox.state.outer_done {
        outbox.push_complete();
      }
    });
  }

  fn is_finished(&self) -> bool {
    let id = self.id;
    let stale = self.shared.downstream.update(|outbox| outbox.state.active != Some(id));
    stale || self.shared.downstream.is_finished()
  }
}

/// Releases the outer source and the current inner observable.
pub struct SwitchOnNextSubscription {
  outer: ProxySubscription<BoxedSubscription>,
  current: MutArc<Option<ProxySubscription<BoxedSubscription>>>,
  closed: SubscriptionFlag,
}

impl Subscription for SwitchOnNextSubscription {
  fn unsubscribe(self) {
    self.closed.set();
    let current = self.current.rc_deref_mut().take();
    if let Some(current) = current {
      current.unsubscribe();
    }
    self.outer.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.closed.is_set() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{from_iter, ObservableExt},
    subject::PublishSubject,
    subscription::Subscription,
  };

  type Source = PublishSubject<i32, &'static str>;

  #[rxlite_macro::test]
  fn follows_latest_inner_only() {
    let outer = PublishSubject::<Source, &'static str>::new();
    let a = Source::new();
    let b = Source::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    outer.clone().switch_on_next().subscribe(move |v| c_out.lock().unwrap().push(v));

    outer.next(a.clone());
    a.next(1);
    outer.next(b.clone());
    assert_eq!(a.subscriber_count(), 0);
    a.next(2);
    b.next(3);
    assert_eq!(*out.lock().unwrap(), vec![1, 3]);
  }

  #[rxlite_macro::test]
  fn completes_after_outer_and_current_inner() {
    let outer = PublishSubject::<Source, &'static str>::new();
    let inner = Source::new();
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    outer
      .clone()
      .switch_on_next()
      .subscribe_all(|_| {}, |_| {}, move || *c_completed.lock().unwrap() = true);

    outer.next(inner.clone());
    outer.complete();
    assert!(!*completed.lock().unwrap());
    inner.complete();
    assert!(*completed.lock().unwrap());
  }

  #[rxlite_macro::test]
  fn inner_error_releases_outer() {
    let outer = PublishSubject::<Source, &'static str>::new();
    let inner = Source::new();
    let err = Arc::new(Mutex::new(None));
    let c_err = err.clone();
    outer
      .clone()
      .switch_on_next()
      .subscribe_err(|_| {}, move |e| *c_err.lock().unwrap() = Some(e));

    outer.next(inner.clone());
    inner.error("inner failed");
    assert_eq!(*err.lock().unwrap(), Some("inner failed"));
    assert_eq!(outer.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn unsubscribe_releases_both_levels() {
    let outer = PublishSubject::<Source, &'static str>::new();
    let inner = Source::new();
    let handle = outer.clone().switch_on_next().subscribe(|_| {});
    outer.next(inner.clone());
    assert_eq!(inner.subscriber_count(), 1);

    handle.unsubscribe();
    assert_eq!(outer.subscriber_count(), 0);
    assert_eq!(inner.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn callback_switches_to_a_new_inner() {
    let outer = PublishSubject::<Source, &'static str>::new();
    let a = Source::new();
    let b = Source::new();
    let out = Arc::new(Mutex::new(vec![]));
    let (c_out, c_outer, c_b) = (out.clone(), outer.clone(), b.clone());
    outer.clone().switch_on_next().subscribe(move |v| {
      c_out.lock().unwrap().push(v);
      if v == 1 {
        c_outer.next(c_b.clone());
      }
    });

    outer.next(a.clone());
    a.next(1);
    a.next(2);
    b.next(3);
    assert_eq!(*out.lock().unwrap(), vec![1, 3]);
    assert_eq!(a.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn flat_map_latest_with_cold_inners() {
    let mut values = vec![];
    let mut completed = false;
    from_iter(1..4)
      .flat_map_latest(|v| from_iter(0..v))
      .subscribe_all(|v| values.push(v), |_| {}, || completed = true);
    assert_eq!(values, vec![0, 0, 1, 0, 1, 2]);
    assert!(completed);
  }
}
