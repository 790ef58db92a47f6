use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, Outbox, SharedObserver},
  subscription::{BoxedSubscription, ProxySubscription, Subscription, TupleSubscription},
};

/// Mirrors whichever source signals first, in any way, and releases the
/// other one.
#[derive(Clone)]
pub struct AmbOp<S1, S2> {
  source1: S1,
  source2: S2,
}

impl<S1, S2> AmbOp<S1, S2> {
  pub(crate) fn new(source1: S1, source2: S2) -> Self { AmbOp { source1, source2 } }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Side {
  First,
  Second,
}

impl<Item, Err, O, S1, S2> Observable<Item, Err, O> for AmbOp<S1, S2>
where
  O: Observer<Item, Err>,
  S1: Observable<Item, Err, AmbObserver<O, Item, Err, BoxedSubscription>>,
  S2: Observable<Item, Err, AmbObserver<O, Item, Err, S1::Unsub>>,
  S2::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<ProxySubscription<S1::Unsub>, ProxySubscription<BoxedSubscription>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = SharedObserver::new(observer, None);
    let first = ProxySubscription::default();
    let second = ProxySubscription::default();

    first.set(self.source1.actual_subscribe(AmbObserver {
      downstream: downstream.clone(),
      side: Side::First,
      other: second.clone(),
    }));
    // A first source that already signalled has won; the second is never
    // subscribed.
    if downstream.update(|outbox| outbox.state.is_none()) {
      let unsub = self.source2.actual_subscribe(AmbObserver {
        downstream,
        side: Side::Second,
        other: first.clone(),
      });
      second.set(BoxedSubscription::new(unsub));
    }
    TupleSubscription::new(first, second)
  }
}

impl<Item, Err, S1, S2> ObservableExt<Item, Err> for AmbOp<S1, S2>
where
  S1: ObservableExt<Item, Err>,
  S2: ObservableExt<Item, Err>,
{
}

/// One side of the race. The shared state holds the winning side.
pub struct AmbObserver<O, Item, Err, U> {
  downstream: SharedObserver<O, Item, Err, Option<Side>>,
  side: Side,
  other: ProxySubscription<U>,
}

impl<O, Item, Err, U> AmbObserver<O, Item, Err, U>
where
  O: Observer<Item, Err>,
  U: Subscription,
{
  /// Runs `f` only if this side wins the race, or has already won it. The
  /// call that claims the race releases the losing side.
  fn if_winner(&self, f: impl FnOnce(&mut Outbox<O, Item, Err, Option<Side>>)) {
    let claimed = self.downstream.update(|outbox| {
      let claimed = outbox.state.is_none();
      let winner = *outbox.state.get_or_insert(self.side);
      if winner == self.side {
        f(outbox);
      }
      claimed
    });
    if claimed {
      tracing::debug!(winner = ?self.side, "amb picked a source");
      self.other.clone().unsubscribe();
    }
  }
}

impl<Item, Err, O, U> Observer<Item, Err> for AmbObserver<O, Item, Err, U>
where
  O: Observer<Item, Err>,
  U: Subscription,
{
  fn next(&mut self, value: Item) { self.if_winner(|outbox| outbox.push_next(value)); }

  fn error(self, err: Err) {
    self.if_winner(|outbox| {
      outbox.push_error(err);
    });
  }

  fn complete(self) {
    self.if_winner(|outbox| {
      outbox.push_complete();
    });
  }

  fn is_finished(&self) -> bool {
    let lost = self
      .downstream
      .update(|outbox| outbox.state.map_or(false, |side| side != self.side));
    lost || self.downstream.is_finished()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{from_iter, never, ObservableExt},
    subject::PublishSubject,
  };

  #[rxlite_macro::test]
  fn first_to_emit_wins() {
    let a = PublishSubject::<i32, ()>::new();
    let b = PublishSubject::<i32, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    a.clone().amb(b.clone()).subscribe(move |v| c_out.lock().unwrap().push(v));

    b.next(10);
    assert_eq!(a.subscriber_count(), 0);
    a.next(1);
    b.next(11);
    assert_eq!(*out.lock().unwrap(), vec![10, 11]);
  }

  #[rxlite_macro::test]
  fn terminal_signal_can_win() {
    let a = PublishSubject::<i32, ()>::new();
    let b = PublishSubject::<i32, ()>::new();
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    a.clone()
      .amb(b.clone())
      .subscribe_all(|_| {}, |_| {}, move || *c_completed.lock().unwrap() = true);

    a.complete();
    assert!(*completed.lock().unwrap());
    assert_eq!(b.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn callback_feeds_the_losing_side() {
    let a = PublishSubject::<i32, ()>::new();
    let b = PublishSubject::<i32, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let (c_out, c_b) = (out.clone(), b.clone());
    a.clone().amb(b.clone()).subscribe(move |v| {
      c_out.lock().unwrap().push(v);
      c_b.next(v * 10);
    });

    a.next(1);
    a.next(2);
    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
    assert_eq!(b.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn synchronous_first_skips_second() {
    let b = PublishSubject::<i32, std::convert::Infallible>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    from_iter(0..3)
      .amb(b.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(*out.lock().unwrap(), vec![0, 1, 2]);
    assert_eq!(b.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn silent_first_loses() {
    let mut out = vec![];
    never::<i32, ()>()
      .amb(from_iter(5..7).map_err(|e| -> () { match e {} }))
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![5, 6]);
  }
}
