use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  subscription::{BoxedSubscription, ProxySubscription, Subscription, TupleSubscription},
  type_hint::TypeHint,
};

/// Emits `func(a, b)` over the latest value of each source whenever either
/// emits, once both have emitted at least once.
///
/// Completes when both sources completed, or as soon as one completes
/// without ever emitting, since no combination can follow.
#[derive(Clone)]
pub struct CombineLatestOp<S1, S2, F, A, B> {
  source1: S1,
  source2: S2,
  func: F,
  _hint: TypeHint<(A, B)>,
}

impl<S1, S2, F, A, B> CombineLatestOp<S1, S2, F, A, B> {
  pub(crate) fn new(source1: S1, source2: S2, func: F) -> Self {
    CombineLatestOp { source1, source2, func, _hint: TypeHint::new() }
  }
}

impl<A, B, Out, Err, O, S1, S2, F> Observable<Out, Err, O> for CombineLatestOp<S1, S2, F, A, B>
where
  O: Observer<Out, Err>,
  S1: Observable<A, Err, CombineLatestFirstObserver<O, F, A, B, Err, BoxedSubscription>>,
  S2: Observable<B, Err, CombineLatestSecondObserver<O, F, A, B, Err, S1::Unsub>>,
  S2::Unsub: Send + 'static,
  F: FnMut(A, B) -> Out,
  A: Clone,
  B: Clone,
{
  type Unsub = TupleSubscription<ProxySubscription<S1::Unsub>, ProxySubscription<BoxedSubscription>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = SharedObserver::new(
      Combiner { observer, func: self.func },
      CombineLatestState { first: None, second: None, first_done: false, second_done: false },
    );
    let first = ProxySubscription::default();
    let second = ProxySubscription::default();

    first.set(self.source1.actual_subscribe(CombineLatestFirstObserver {
      downstream: downstream.clone(),
      other: second.clone(),
    }));
    if !downstream.is_stopped() {
      let unsub = self
        .source2
        .actual_subscribe(CombineLatestSecondObserver { downstream, other: first.clone() });
      second.set(BoxedSubscription::new(unsub));
    }
    TupleSubscription::new(first, second)
  }
}

impl<A, B, Out, Err, S1, S2, F> ObservableExt<Out, Err> for CombineLatestOp<S1, S2, F, A, B>
where
  S1: ObservableExt<A, Err>,
  S2: ObservableExt<B, Err>,
  F: FnMut(A, B) -> Out,
{
}

/// Applies the combining function on the delivering thread, after the
/// shared state is unlocked.
pub struct Combiner<O, F> {
  observer: O,
  func: F,
}

impl<A, B, Out, Err, O, F> Observer<(A, B), Err> for Combiner<O, F>
where
  O: Observer<Out, Err>,
  F: FnMut(A, B) -> Out,
{
  fn next(&mut self, (a, b): (A, B)) { self.observer.next((self.func)(a, b)) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

struct CombineLatestState<A, B> {
  first: Option<A>,
  second: Option<B>,
  first_done: bool,
  second_done: bool,
}

type Combined<O, F, A, B, Err> = SharedObserver<Combiner<O, F>, (A, B), Err, CombineLatestState<A, B>>;

pub struct CombineLatestFirstObserver<O, F, A, B, Err, U> {
  downstream: Combined<O, F, A, B, Err>,
  other: ProxySubscription<U>,
}

pub struct CombineLatestSecondObserver<O, F, A, B, Err, U> {
  downstream: Combined<O, F, A, B, Err>,
  other: ProxySubscription<U>,
}

macro_rules! impl_combine_latest_side {
  ($side:ident, $item:ident, $mine:ident, $mine_done:ident, $theirs_done:ident) => {
    impl<A, B, Out, Err, O, F, U> Observer<$item, Err> for $side<O, F, A, B, Err, U>
    where
      O: Observer<Out, Err>,
      F: FnMut(A, B) -> Out,
      A: Clone,
      B: Clone,
      U: Subscription,
    {
      fn next(&mut self, value: $item) {
        self.downstream.update(|outbox| {
          if outbox.is_stopped() {
            return;
          }
          let state = &mut outbox.state;
          state.$mine = Some(value);
          let pair = match (&state.first, &state.second) {
            (Some(a), Some(b)) => Some((a.clone(), b.clone())),
            _ => None,
          };
          if let Some(pair) = pair {
            outbox.push_next(pair);
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
          let state = &mut outbox.state;
          state.$mine_done = true;
          let done = state.$theirs_done || state.$mine.is_none();
          done && outbox.push_complete()
        });
        if finished {
          self.other.unsubscribe();
        }
      }

      fn is_finished(&self) -> bool { self.downstream.is_finished() }
    }
  };
}

impl_combine_latest_side!(CombineLatestFirstObserver, A, first, first_done, second_done);
impl_combine_latest_side!(CombineLatestSecondObserver, B, second, second_done, first_done);
