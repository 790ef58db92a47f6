use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscription::{BoxedSubscription, ProxySubscription, Subscription},
};

/// Emits only the first `count` values, then completes.
///
/// Once the last value is forwarded the observer reports itself finished,
/// so synchronous sources stop producing, and the upstream subscription is
/// released right after the synthesized completion.
#[derive(Clone)]
pub struct TakeOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { TakeOp { source, count } }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for TakeOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TakeObserver<O>>,
  S::Unsub: Send + 'static,
{
  type Unsub = ProxySubscription<BoxedSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = ProxySubscription::default();
    if self.count == 0 {
      observer.complete();
      upstream.clone().unsubscribe();
      return upstream;
    }
    let observer = TakeObserver { observer: Some(observer), remaining: self.count, upstream: upstream.clone() };
    let unsub = self.source.actual_subscribe(observer);
    upstream.set(BoxedSubscription::new(unsub));
    upstream
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for TakeOp<S> where S: ObservableExt<Item, Err> {}

pub struct TakeObserver<O> {
  observer: Option<O>,
  remaining: usize,
  upstream: ProxySubscription<BoxedSubscription>,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.remaining == 0 {
      return;
    }
    self.remaining -= 1;
    if self.remaining > 0 {
      if let Some(observer) = self.observer.as_mut() {
        observer.next(value);
      }
    } else if let Some(mut observer) = self.observer.take() {
      observer.next(value);
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
