use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscription::{ProxySubscription, Subscription, TupleSubscription},
};

/// Plays `source1` to completion, then `source2`.
///
/// `source2` is not subscribed until `source1` completes, and never if it
/// errors.
#[derive(Clone)]
pub struct ConcatOp<S1, S2> {
  source1: S1,
  source2: S2,
}

impl<S1, S2> ConcatOp<S1, S2> {
  pub(crate) fn new(source1: S1, source2: S2) -> Self { ConcatOp { source1, source2 } }
}

impl<Item, Err, O, S1, S2> Observable<Item, Err, O> for ConcatOp<S1, S2>
where
  O: Observer<Item, Err>,
  S1: Observable<Item, Err, ConcatObserver<O, S2, S2::Unsub>>,
  S2: Observable<Item, Err, O>,
{
  type Unsub = TupleSubscription<S1::Unsub, ProxySubscription<S2::Unsub>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let second = ProxySubscription::default();
    let first = self.source1.actual_subscribe(ConcatObserver {
      observer,
      next_source: self.source2,
      second: second.clone(),
    });
    TupleSubscription::new(first, second)
  }
}

impl<Item, Err, S1, S2> ObservableExt<Item, Err> for ConcatOp<S1, S2>
where
  S1: ObservableExt<Item, Err>,
  S2: ObservableExt<Item, Err>,
{
}

pub struct ConcatObserver<O, S, U> {
  observer: O,
  next_source: S,
  second: ProxySubscription<U>,
}

impl<Item, Err, O, S, U> Observer<Item, Err> for ConcatObserver<O, S, U>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, O, Unsub = U>,
  U: Subscription,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) {
    // Unsubscribed while the first source was still running.
    if self.second.is_closed() {
      return;
    }
    self.second.set(self.next_source.actual_subscribe(self.observer));
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{from_iter, ObservableExt},
    subject::PublishSubject,
    subscription::Subscription,
  };

  #[rxlite_macro::test]
  fn plays_in_sequence() {
    let mut out = vec![];
    let mut completed = 0;
    from_iter(0..3)
      .concat(from_iter(10..12))
      .subscribe_all(|v| out.push(v), |_| {}, || completed += 1);
    assert_eq!(out, vec![0, 1, 2, 10, 11]);
    assert_eq!(completed, 1);
  }

  #[rxlite_macro::test]
  fn second_waits_for_first() {
    let first = PublishSubject::<i32, ()>::new();
    let second = PublishSubject::<i32, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    first
      .clone()
      .concat(second.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    second.next(100);
    assert_eq!(second.subscriber_count(), 0);
    first.next(1);
    first.complete();
    second.next(2);
    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
  }

  #[rxlite_macro::test]
  fn error_skips_second() {
    let first = PublishSubject::<i32, &str>::new();
    let second = PublishSubject::<i32, &str>::new();
    let err = Arc::new(Mutex::new(None));
    let c_err = err.clone();
    first
      .clone()
      .concat(second.clone())
      .subscribe_err(|_| {}, move |e| *c_err.lock().unwrap() = Some(e));
    first.error("first failed");
    assert_eq!(second.subscriber_count(), 0);
    assert_eq!(*err.lock().unwrap(), Some("first failed"));
  }

  #[rxlite_macro::test]
  fn unsubscribe_before_switch_never_subscribes_second() {
    let first = PublishSubject::<i32, ()>::new();
    let second = PublishSubject::<i32, ()>::new();
    let handle = first.clone().concat(second.clone()).subscribe(|_| {});
    handle.unsubscribe();
    first.complete();
    assert_eq!(second.subscriber_count(), 0);
  }
}
