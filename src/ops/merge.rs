use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  subscription::{BoxedSubscription, ProxySubscription, Subscription, TupleSubscription},
};

/// Interleaves the values of two sources.
///
/// Completes once both sources completed. The first error terminates the
/// output and releases the other source.
#[derive(Clone)]
pub struct MergeOp<S1, S2> {
  source1: S1,
  source2: S2,
}

impl<S1, S2> MergeOp<S1, S2> {
  pub(crate) fn new(source1: S1, source2: S2) -> Self { MergeOp { source1, source2 } }
}

impl<Item, Err, O, S1, S2> Observable<Item, Err, O> for MergeOp<S1, S2>
where
  O: Observer<Item, Err>,
  S1: Observable<Item, Err, MergeObserver<O, Item, Err, BoxedSubscription>>,
  S2: Observable<Item, Err, MergeObserver<O, Item, Err, S1::Unsub>>,
  S2::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<ProxySubscription<S1::Unsub>, ProxySubscription<BoxedSubscription>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = SharedObserver::new(observer, false);
    let first = ProxySubscription::default();
    let second = ProxySubscription::default();

    first.set(
      self
        .source1
        .actual_subscribe(MergeObserver { downstream: downstream.clone(), other: second.clone() }),
    );
    if !downstream.is_stopped() {
      let unsub = self
        .source2
        .actual_subscribe(MergeObserver { downstream, other: first.clone() });
      second.set(BoxedSubscription::new(unsub));
    }
    TupleSubscription::new(first, second)
  }
}

impl<Item, Err, S1, S2> ObservableExt<Item, Err> for MergeOp<S1, S2>
where
  S1: ObservableExt<Item, Err>,
  S2: ObservableExt<Item, Err>,
{
}

/// Observes one side of a merge. `other` is the subscription to the other
/// side, released when this side errors. The shared state records whether
/// one side has completed already.
pub struct MergeObserver<O, Item, Err, U> {
  downstream: SharedObserver<O, Item, Err, bool>,
  other: ProxySubscription<U>,
}

impl<Item, Err, O, U> Observer<Item, Err> for MergeObserver<O, Item, Err, U>
where
  O: Observer<Item, Err>,
  U: Subscription,
{
  fn next(&mut self, value: Item) { self.downstream.next(value) }

  fn error(self, err: Err) {
    if self.downstream.error(err) {
      self.other.unsubscribe();
    }
  }

  fn complete(self) {
    self.downstream.update(|outbox| {
      if outbox.state {
        outbox.push_complete();
      } else {
        outbox.state = true;
      }
    });
  }

  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}
