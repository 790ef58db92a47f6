use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

#[derive(Clone)]
pub struct SkipOp<S> {
  source: S,
  count: usize,
}

impl<S> SkipOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { SkipOp { source, count } }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for SkipOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, SkipObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(SkipObserver { observer, remaining: self.count })
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for SkipOp<S> where S: ObservableExt<Item, Err> {}

pub struct SkipObserver<O> {
  observer: O,
  remaining: usize,
}

impl<Item, Err, O> Observer<Item, Err> for SkipObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.remaining == 0 {
      self.observer.next(value);
    } else {
      self.remaining -= 1;
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
  fn base_function() {
    let mut out = vec![];
    let mut completed = 0;
    from_iter(0..10)
      .skip(5)
      .subscribe_all(|v| out.push(v), |_| {}, || completed += 1);
    assert_eq!(out, vec![5, 6, 7, 8, 9]);
    assert_eq!(completed, 1);
  }

  #[rxlite_macro::test]
  fn skip_more_than_available_still_completes() {
    let mut hits = 0;
    let mut completed = false;
    from_iter(0..3)
      .skip(10)
      .subscribe_all(|_| hits += 1, |_| {}, || completed = true);
    assert_eq!(hits, 0);
    assert!(completed);
  }

  #[rxlite_macro::test]
  fn skip_zero_forwards_everything() {
    let mut out = vec![];
    from_iter(0..3).skip(0).subscribe(|v| out.push(v));
    assert_eq!(out, vec![0, 1, 2]);
  }
}
