use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscription::{BoxedSubscription, ProxySubscription, Subscription},
};

/// Emits `true` and completes as soon as `target` shows up, or `false` once
/// the source completes without it.
#[derive(Clone)]
pub struct ContainsOp<S, Item> {
  source: S,
  target: Item,
}

impl<S, Item> ContainsOp<S, Item> {
  pub(crate) fn new(source: S, target: Item) -> Self { ContainsOp { source, target } }
}

impl<Item, Err, O, S> Observable<bool, Err, O> for ContainsOp<S, Item>
where
  O: Observer<bool, Err>,
  S: Observable<Item, Err, ContainsObserver<O, Item>>,
  S::Unsub: Send + 'static,
  Item: PartialEq,
{
  type Unsub = ProxySubscription<BoxedSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = ProxySubscription::default();
    let observer = ContainsObserver { observer: Some(observer), target: self.target, upstream: upstream.clone() };
    let unsub = self.source.actual_subscribe(observer);
    upstream.set(BoxedSubscription::new(unsub));
    upstream
  }
}

impl<Item, Err, S> ObservableExt<bool, Err> for ContainsOp<S, Item> where S: ObservableExt<Item, Err> {}

pub struct ContainsObserver<O, Item> {
  observer: Option<O>,
  target: Item,
  upstream: ProxySubscription<BoxedSubscription>,
}

impl<Item, Err, O> Observer<Item, Err> for ContainsObserver<O, Item>
where
  O: Observer<bool, Err>,
  Item: PartialEq,
{
  fn next(&mut self, value: Item) {
    if value != self.target {
      return;
    }
    if let Some(mut observer) = self.observer.take() {
      observer.next(true);
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
    if let Some(mut observer) = self.observer {
      observer.next(false);
      observer.complete();
    }
  }

  fn is_finished(&self) -> bool { self.observer.as_ref().map_or(true, |o| o.is_finished()) }
}

#[cfg(test)]
mod tests {
  use crate::observable::{from_iter, ObservableExt};

  #[rxlite_macro::test]
  fn found_stops_early() {
    let mut out = vec![];
    let mut pulled = 0;
    from_iter(0..100)
      .tap(|_| pulled += 1)
      .contains(3)
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![true]);
    assert_eq!(pulled, 4);
  }

  #[rxlite_macro::test]
  fn missing_reports_false() {
    let mut out = vec![];
    from_iter(0..5).contains(9).subscribe(|v| out.push(v));
    assert_eq!(out, vec![false]);
  }
}
