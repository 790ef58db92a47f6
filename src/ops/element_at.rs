use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscription::{BoxedSubscription, ProxySubscription, Subscription},
};

/// Forwards only the value at `index`, then completes. A source that ends
/// sooner completes the output empty.
#[derive(Clone)]
pub struct ElementAtOp<S> {
  source: S,
  index: usize,
}

impl<S> ElementAtOp<S> {
  pub(crate) fn new(source: S, index: usize) -> Self { ElementAtOp { source, index } }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for ElementAtOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, ElementAtObserver<O>>,
  S::Unsub: Send + 'static,
{
  type Unsub = ProxySubscription<BoxedSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = ProxySubscription::default();
    let observer = ElementAtObserver { observer: Some(observer), remaining: self.index, upstream: upstream.clone() };
    let unsub = self.source.actual_subscribe(observer);
    upstream.set(BoxedSubscription::new(unsub));
    upstream
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for ElementAtOp<S> where S: ObservableExt<Item, Err> {}

pub struct ElementAtObserver<O> {
  observer: Option<O>,
  remaining: usize,
  upstream: ProxySubscription<BoxedSubscription>,
}

impl<Item, Err, O> Observer<Item, Err> for ElementAtObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.remaining > 0 {
      self.remaining -= 1;
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
