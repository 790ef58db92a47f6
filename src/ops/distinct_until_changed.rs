use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

#[derive(Clone)]
pub struct DistinctUntilChangedOp<S, F> {
  source: S,
  eq: F,
}

impl<S, F> DistinctUntilChangedOp<S, F> {
  pub(crate) fn new(source: S, eq: F) -> Self { DistinctUntilChangedOp { source, eq } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for DistinctUntilChangedOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, DistinctUntilChangedObserver<O, F, Item>>,
  F: FnMut(&Item, &Item) -> bool,
  Item: Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(DistinctUntilChangedObserver {
      observer,
      eq: self.eq,
      last: None,
    })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for DistinctUntilChangedOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item, &Item) -> bool,
{
}

pub struct DistinctUntilChangedObserver<O, F, Item> {
  observer: O,
  eq: F,
  last: Option<Item>,
}

impl<Item, Err, O, F> Observer<Item, Err> for DistinctUntilChangedObserver<O, F, Item>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item, &Item) -> bool,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    let changed = match &self.last {
      Some(last) => !(self.eq)(last, &value),
      None => true,
    };
    if changed {
      self.last = Some(value.clone());
      self.observer.next(value);
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
  fn drops_consecutive_duplicates() {
    let mut out = vec![];
    from_iter(vec![1, 1, 2, 2, 2, 1, 3, 3])
      .distinct_until_changed()
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![1, 2, 1, 3]);
  }

  #[rxlite_macro::test]
  fn custom_equality_compares_to_last_forwarded() {
    // Values within 2 of the last forwarded one count as equal.
    let mut out = vec![];
    from_iter(vec![1, 2, 3, 4, 10, 11])
      .distinct_until_changed_by(|a: &i32, b: &i32| (a - b).abs() <= 2)
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![1, 4, 10]);
  }

  #[rxlite_macro::test]
  fn first_value_always_passes() {
    let mut out = vec![];
    from_iter(vec!["a"])
      .distinct_until_changed_by(|_: &&str, _: &&str| true)
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec!["a"]);
  }
}
