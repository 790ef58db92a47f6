use std::collections::VecDeque;

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  subscription::{BoxedSubscription, ProxySubscription, Subscription, TupleSubscription},
};

/// Pairs the values of two sources by index.
///
/// Each side buffers its unmatched values in a FIFO queue. Once one side
/// has completed and its queue is drained no further pair is possible, so
/// the output completes right away and the other source is released.
#[derive(Clone)]
pub struct ZipOp<S1, S2> {
  source1: S1,
  source2: S2,
}

impl<S1, S2> ZipOp<S1, S2> {
  pub(crate) fn new(source1: S1, source2: S2) -> Self { ZipOp { source1, source2 } }
}

impl<A, B, Err, O, S1, S2> Observable<(A, B), Err, O> for ZipOp<S1, S2>
where
  O: Observer<(A, B), Err>,
  S1: Observable<A, Err, ZipFirstObserver<O, A, B, Err, BoxedSubscription>>,
  S2: Observable<B, Err, ZipSecondObserver<O, A, B, Err, S1::Unsub>>,
  S2::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<ProxySubscription<S1::Unsub>, ProxySubscription<BoxedSubscription>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = SharedObserver::new(
      observer,
      ZipState { first: VecDeque::new(), second: VecDeque::new(), first_done: false, second_done: false },
    );
    let first = ProxySubscription::default();
    let second = ProxySubscription::default();

    first.set(
      self
        .source1
        .actual_subscribe(ZipFirstObserver { downstream: downstream.clone(), other: second.clone() }),
    );
    if !downstream.is_stopped() {
      let unsub = self
        .source2
        .actual_subscribe(ZipSecondObserver { downstream, other: first.clone() });
      second.set(BoxedSubscription::new(unsub));
    }
    TupleSubscription::new(first, second)
  }
}

impl<A, B, Err, S1, S2> ObservableExt<(A, B), Err> for ZipOp<S1, S2>
where
  S1: ObservableExt<A, Err>,
  S2: ObservableExt<B, Err>,
{
}

struct ZipState<A, B> {
  first: VecDeque<A>,
  second: VecDeque<B>,
  first_done: bool,
  second_done: bool,
}

impl<A, B> ZipState<A, B> {
  fn is_exhausted(&self) -> bool {
    (self.first_done && self.first.is_empty()) || (self.second_done && self.second.is_empty())
  }
}

type Zipped<O, A, B, Err> = SharedObserver<O, (A, B), Err, ZipState<A, B>>;

pub struct ZipFirstObserver<O, A, B, Err, U> {
  downstream: Zipped<O, A, B, Err>,
  other: ProxySubscription<U>,
}

pub struct ZipSecondObserver<O, A, B, Err, U> {
  downstream: Zipped<O, A, B, Err>,
  other: ProxySubscription<U>,
}

macro_rules! impl_zip_side {
  ($side:ident, $item:ident, $mine:ident, $mine_done:ident, $theirs:ident,
   |$value:ident, $matched:ident| $pair:expr) => {
    impl<A, B, Err, O, U> Observer<$item, Err> for $side<O, A, B, Err, U>
    where
      O: Observer<(A, B), Err>,
      U: Subscription,
    {
      fn next(&mut self, $value: $item) {
        self.downstream.update(|outbox| {
          if outbox.is_stopped() {
            return;
          }
          let Some($matched) = outbox.state.$theirs.pop_front() else {
            outbox.state.$mine.push_back($value);
            return;
          };
          let exhausted = outbox.state.is_exhausted();
          outbox.push_next($pair);
          if exhausted {
            tracing::trace!("zip exhausted");
            outbox.push_complete();
          }
        });
      }

      fn error(self, err: Err) {
        if self.downstream.error(err) {
          self.other.unsubscribe();
        }
      }

      fn complete(self) {
        let finished = self.downstream.update(|outbox| {
          outbox.state.$mine_done = true;
          outbox.state.is_exhausted() && outbox.push_complete()
        });
        if finished {
          tracing::trace!("zip exhausted");
          self.other.unsubscribe();
        }
      }

      fn is_finished(&self) -> bool { self.downstream.is_finished() }
    }
  };
}

impl_zip_side!(ZipFirstObserver, A, first, first_done, second, |value, matched| (value, matched));
impl_zip_side!(ZipSecondObserver, B, second, second_done, first, |value, matched| (matched, value));

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{from_iter, ObservableExt},
    subject::PublishSubject,
  };

  #[rxlite_macro::test]
  fn shorter_source_bounds_output() {
    let mut out = vec![];
    let mut completed = 0;
    from_iter(1..=4)
      .zip(from_iter(vec!['a', 'b', 'c', 'd', 'e']))
      .subscribe_all(|v| out.push(v), |_| {}, || completed += 1);
    assert_eq!(out, vec![(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
    assert_eq!(completed, 1);
  }

  #[rxlite_macro::test]
  fn pairs_by_index_across_hot_sources() {
    let a = PublishSubject::<i32, ()>::new();
    let b = PublishSubject::<&'static str, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    a.clone().zip(b.clone()).subscribe(move |v| c_out.lock().unwrap().push(v));

    a.next(1);
    a.next(2);
    b.next("x");
    a.next(3);
    b.next("y");
    b.next("z");
    assert_eq!(*out.lock().unwrap(), vec![(1, "x"), (2, "y"), (3, "z")]);
  }

  #[rxlite_macro::test]
  fn exhausted_side_completes_and_releases_other() {
    let a = PublishSubject::<i32, ()>::new();
    let b = PublishSubject::<i32, ()>::new();
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    a.clone()
      .zip(b.clone())
      .subscribe_all(|_| {}, |_| {}, move || *c_completed.lock().unwrap() = true);

    a.complete();
    assert!(*completed.lock().unwrap());
    assert_eq!(b.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn completed_side_with_buffer_keeps_going() {
    let a = PublishSubject::<i32, ()>::new();
    let b = PublishSubject::<i32, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(Mutex::new(false));
    let (c_out, c_completed) = (out.clone(), completed.clone());
    a.clone().zip(b.clone()).subscribe_all(
      move |v| c_out.lock().unwrap().push(v),
      |_| {},
      move || *c_completed.lock().unwrap() = true,
    );

    a.next(1);
    a.next(2);
    a.complete();
    assert!(!*completed.lock().unwrap());
    b.next(10);
    b.next(20);
    assert!(*completed.lock().unwrap());
    assert_eq!(*out.lock().unwrap(), vec![(1, 10), (2, 20)]);
  }

  #[rxlite_macro::test]
  fn callback_feeds_the_other_side() {
    let a = PublishSubject::<i32, ()>::new();
    let b = PublishSubject::<i32, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let (c_out, c_b) = (out.clone(), b.clone());
    a.clone().zip(b.clone()).subscribe(move |(x, y)| {
      c_out.lock().unwrap().push((x, y));
      c_b.next(y + 1);
    });

    b.next(10);
    a.next(1);
    a.next(2);
    a.next(3);
    assert_eq!(*out.lock().unwrap(), vec![(1, 10), (2, 11), (3, 12)]);
  }

  #[rxlite_macro::test]
  fn error_from_either_side_terminates() {
    let a = PublishSubject::<i32, &str>::new();
    let b = PublishSubject::<i32, &str>::new();
    let err = Arc::new(Mutex::new(None));
    let c_err = err.clone();
    a.clone()
      .zip(b.clone())
      .subscribe_err(|_| {}, move |e| *c_err.lock().unwrap() = Some(e));
    a.next(1);
    b.error("b broke");
    assert_eq!(*err.lock().unwrap(), Some("b broke"));
    assert_eq!(a.subscriber_count(), 0);
  }
}
