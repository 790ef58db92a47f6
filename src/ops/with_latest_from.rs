use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  subscription::{BoxedSubscription, ProxySubscription, Subscription, TupleSubscription},
};

/// Pairs every value of the primary source with the latest value of the
/// other one. Primary values that arrive before the other source emitted
/// are dropped.
///
/// The other source is subscribed first. Its completion is ignored; the
/// output ends with the primary source, or with an error from either.
#[derive(Clone)]
pub struct WithLatestFromOp<S1, S2> {
  source1: S1,
  source2: S2,
}

impl<S1, S2> WithLatestFromOp<S1, S2> {
  pub(crate) fn new(source1: S1, source2: S2) -> Self { WithLatestFromOp { source1, source2 } }
}

impl<A, B, Err, O, S1, S2> Observable<(A, B), Err, O> for WithLatestFromOp<S1, S2>
where
  O: Observer<(A, B), Err>,
  S1: Observable<A, Err, WithLatestFromObserver<O, A, B, Err>>,
  S2: Observable<B, Err, LatestObserver<O, A, B, Err, S1::Unsub>>,
  S2::Unsub: Send + 'static,
  B: Clone,
{
  type Unsub = TupleSubscription<ProxySubscription<S1::Unsub>, ProxySubscription<BoxedSubscription>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = SharedObserver::new(observer, None);
    let primary = ProxySubscription::default();
    let other = ProxySubscription::default();

    other.set(BoxedSubscription::new(
      self
        .source2
        .actual_subscribe(LatestObserver { downstream: downstream.clone(), primary: primary.clone() }),
    ));
    if !downstream.is_stopped() {
      primary.set(
        self
          .source1
          .actual_subscribe(WithLatestFromObserver { downstream, other: other.clone() }),
      );
    }
    TupleSubscription::new(primary, other)
  }
}

impl<A, B, Err, S1, S2> ObservableExt<(A, B), Err> for WithLatestFromOp<S1, S2>
where
  S1: ObservableExt<A, Err>,
  S2: ObservableExt<B, Err>,
{
}

/// The downstream, sharing the latest value of the other source.
type Latest<O, A, B, Err> = SharedObserver<O, (A, B), Err, Option<B>>;

/// Observes the primary source.
pub struct WithLatestFromObserver<O, A, B, Err> {
  downstream: Latest<O, A, B, Err>,
  other: ProxySubscription<BoxedSubscription>,
}

impl<A, B, Err, O> Observer<A, Err> for WithLatestFromObserver<O, A, B, Err>
where
  O: Observer<(A, B), Err>,
  B: Clone,
{
  fn next(&mut self, value: A) {
    self.downstream.update(|outbox| {
      let latest = outbox.state.clone();
      if let Some(latest) = latest {
        outbox.push_next((value, latest));
      }
    });
  }

  fn error(self, err: Err) {
    if self.downstream.error(err) {
      self.other.unsubscribe();
    }
  }

  fn complete(self) {
    if self.downstream.complete() {
      self.other.unsubscribe();
    }
  }

  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}

/// Observes the other source, keeping its latest value.
pub struct LatestObserver<O, A, B, Err, U> {
  downstream: Latest<O, A, B, Err>,
  primary: ProxySubscription<U>,
}

impl<A, B, Err, O, U> Observer<B, Err> for LatestObserver<O, A, B, Err, U>
where
  O: Observer<(A, B), Err>,
  U: Subscription,
{
  fn next(&mut self, value: B) { self.downstream.update(|outbox| outbox.state = Some(value)); }

  fn error(self, err: Err) {
    if self.downstream.error(err) {
      self.primary.unsubscribe();
    }
  }

  fn complete(self) {}

  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{of, ObservableExt},
    subject::{BehaviorSubject, PublishSubject},
  };

  #[rxlite_macro::test]
  fn samples_latest_other_value() {
    let primary = PublishSubject::<i32, ()>::new();
    let other = PublishSubject::<&'static str, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    primary
      .clone()
      .with_latest_from(other.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    primary.next(0);
    other.next("a");
    other.next("b");
    primary.next(1);
    primary.next(2);
    other.next("c");
    primary.next(3);
    assert_eq!(*out.lock().unwrap(), vec![(1, "b"), (2, "b"), (3, "c")]);
  }

  #[rxlite_macro::test]
  fn callback_updates_the_sample() {
    let primary = PublishSubject::<i32, ()>::new();
    let other = PublishSubject::<i32, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let (c_out, c_other) = (out.clone(), other.clone());
    primary.clone().with_latest_from(other.clone()).subscribe(move |v| {
      c_out.lock().unwrap().push(v);
      c_other.next(7);
    });

    other.next(5);
    primary.next(1);
    primary.next(2);
    assert_eq!(*out.lock().unwrap(), vec![(1, 5), (2, 7)]);
  }

  #[rxlite_macro::test]
  fn take_releases_the_sampled_source() {
    let primary = PublishSubject::<i32, ()>::new();
    let other = BehaviorSubject::<i32, ()>::new(0);
    for _ in 0..3 {
      primary.clone().with_latest_from(other.clone()).take(1).subscribe(|_| {});
      primary.next(1);
    }
    assert_eq!(primary.subscriber_count(), 0);
    assert_eq!(other.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn other_completion_keeps_last_value() {
    let primary = PublishSubject::<i32, ()>::new();
    let other = BehaviorSubject::<i32, ()>::new(7);
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    primary
      .clone()
      .with_latest_from(other.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    other.complete();
    primary.next(1);
    assert_eq!(*out.lock().unwrap(), vec![(1, 7)]);
  }

  #[rxlite_macro::test]
  fn primary_completion_releases_other() {
    let other = PublishSubject::<i32, std::convert::Infallible>::new();
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    of(1)
      .with_latest_from(other.clone())
      .subscribe_all(|_| {}, |_| {}, move || *c_completed.lock().unwrap() = true);
    assert!(*completed.lock().unwrap());
    assert_eq!(other.subscriber_count(), 0);
  }
}
