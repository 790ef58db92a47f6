use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscription::{BoxedSubscription, ProxySubscription, Subscription},
};

/// Whether the value that ends a `take_until_predicate` is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TakeBehavior {
  #[default]
  Exclusive,
  Inclusive,
}

/// Shared engine of `take_while`, `take_while_inclusive` and
/// `take_until_predicate`.
///
/// `until` flips the predicate: the stream stops on the first value for
/// which `predicate` holds instead of the first for which it fails.
#[derive(Clone)]
pub struct TakeWhileOp<S, F> {
  source: S,
  predicate: F,
  inclusive: bool,
  until: bool,
}

impl<S, F> TakeWhileOp<S, F> {
  pub(crate) fn new(source: S, predicate: F, inclusive: bool, until: bool) -> Self {
    TakeWhileOp { source, predicate, inclusive, until }
  }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for TakeWhileOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TakeWhileObserver<O, F>>,
  S::Unsub: Send + 'static,
  F: FnMut(&Item) -> bool,
{
  type Unsub = ProxySubscription<BoxedSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = ProxySubscription::default();
    let unsub = self.source.actual_subscribe(TakeWhileObserver {
      observer: Some(observer),
      predicate: self.predicate,
      inclusive: self.inclusive,
      until: self.until,
      upstream: upstream.clone(),
    });
    upstream.set(BoxedSubscription::new(unsub));
    upstream
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for TakeWhileOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item) -> bool,
{
}

pub struct TakeWhileObserver<O, F> {
  observer: Option<O>,
  predicate: F,
  inclusive: bool,
  until: bool,
  upstream: ProxySubscription<BoxedSubscription>,
}

impl<Item, Err, O, F> Observer<Item, Err> for TakeWhileObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    let keep_going = (self.predicate)(&value) != self.until;
    if keep_going {
      if let Some(observer) = self.observer.as_mut() {
        observer.next(value);
      }
    } else if let Some(mut observer) = self.observer.take() {
      if self.inclusive {
        observer.next(value);
      }
      observer.complete();
      self.upstream.clone().unsubscribe();
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self.observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self.observer {
      observer.complete();
    }
  }

  fn is_finished(&self) -> bool { self.observer.as_ref().map_or(true, |o| o.is_finished()) }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::TakeBehavior;
  use crate::{
    observable::{from_iter, ObservableExt},
    subject::PublishSubject,
  };

  #[rxlite_macro::test]
  fn take_while_excludes_failing_value() {
    let mut out = vec![];
    let mut completed = false;
    from_iter(1..10)
      .take_while(|v| *v < 4)
      .subscribe_all(|v| out.push(v), |_| {}, || completed = true);
    assert_eq!(out, vec![1, 2, 3]);
    assert!(completed);
  }

  #[rxlite_macro::test]
  fn take_while_inclusive_forwards_failing_value() {
    let mut out = vec![];
    from_iter(1..10).take_while_inclusive(|v| *v < 4).subscribe(|v| out.push(v));
    assert_eq!(out, vec![1, 2, 3, 4]);
  }

  #[rxlite_macro::test]
  fn take_until_multiple_of_four() {
    let mut exclusive = vec![];
    from_iter(1..=5)
      .take_until_predicate(|v| v % 4 == 0, TakeBehavior::Exclusive)
      .subscribe(|v| exclusive.push(v));
    assert_eq!(exclusive, vec![1, 2, 3]);

    let mut inclusive = vec![];
    from_iter(1..=5)
      .take_until_predicate(|v| v % 4 == 0, TakeBehavior::Inclusive)
      .subscribe(|v| inclusive.push(v));
    assert_eq!(inclusive, vec![1, 2, 3, 4]);
  }

  #[rxlite_macro::test]
  fn source_completing_first_completes() {
    let mut completed = false;
    from_iter(1..3)
      .take_while(|_| true)
      .subscribe_all(|_| {}, |_| {}, || completed = true);
    assert!(completed);
  }

  #[rxlite_macro::test]
  fn failing_value_releases_both_zipped_sources() {
    let a = PublishSubject::<i32, ()>::new();
    let b = PublishSubject::<i32, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    a.clone()
      .zip(b.clone())
      .take_while(|(x, _)| *x < 2)
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    a.next(1);
    b.next(10);
    a.next(2);
    b.next(20);
    assert_eq!(*out.lock().unwrap(), vec![(1, 10)]);
    assert_eq!(a.subscriber_count(), 0);
    assert_eq!(b.subscriber_count(), 0);
  }
}
