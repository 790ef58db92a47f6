use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Emit only those values that pass a predicate.
#[derive(Clone)]
pub struct FilterOp<S, F> {
  source: S,
  predicate: F,
}

impl<S, F> FilterOp<S, F> {
  pub(crate) fn new(source: S, predicate: F) -> Self { FilterOp { source, predicate } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for FilterOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, FilterObserver<O, F>>,
  F: FnMut(&Item) -> bool,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(FilterObserver { observer, predicate: self.predicate })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for FilterOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item) -> bool,
{
}

pub struct FilterObserver<O, F> {
  observer: O,
  predicate: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.observer.next(value)
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[cfg(test)]
mod tests {
  use crate::observable::{from_iter, ObservableExt};

  #[rxlite_macro::test]
  fn keeps_even_numbers() {
    let mut out = vec![];
    let mut completed = false;
    from_iter(0..10)
      .filter(|v| v % 2 == 0)
      .subscribe_all(|v| out.push(v), |_| {}, || completed = true);
    assert_eq!(out, vec![0, 2, 4, 6, 8]);
    assert!(completed);
  }

  #[rxlite_macro::test]
  fn forwards_error() {
    let mut err = None;
    crate::observable::throw_err::<i32, _>("boom")
      .filter(|_| true)
      .subscribe_err(|_| {}, |e| err = Some(e));
    assert_eq!(err, Some("boom"));
  }
}
