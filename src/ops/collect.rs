use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Buffers every value and emits them as one `Vec` on completion.
#[derive(Clone)]
pub struct CollectOp<S> {
  source: S,
}

impl<S> CollectOp<S> {
  pub(crate) fn new(source: S) -> Self { CollectOp { source } }
}

impl<Item, Err, O, S> Observable<Vec<Item>, Err, O> for CollectOp<S>
where
  O: Observer<Vec<Item>, Err>,
  S: Observable<Item, Err, CollectObserver<O, Item>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(CollectObserver { observer, values: vec![] })
  }
}

impl<Item, Err, S> ObservableExt<Vec<Item>, Err> for CollectOp<S> where S: ObservableExt<Item, Err> {}

pub struct CollectObserver<O, Item> {
  observer: O,
  values: Vec<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for CollectObserver<O, Item>
where
  O: Observer<Vec<Item>, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.values.push(value); }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(mut self) {
    self.observer.next(self.values);
    self.observer.complete();
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[cfg(test)]
mod tests {
  use crate::observable::{empty, from_iter, ObservableExt};

  #[rxlite_macro::test]
  fn gathers_everything() {
    let mut out = None;
    from_iter(0..4).collect().subscribe(|v| out = Some(v));
    assert_eq!(out, Some(vec![0, 1, 2, 3]));
  }

  #[rxlite_macro::test]
  fn empty_source_emits_empty_vec() {
    let mut out = None;
    empty::<i32, ()>().collect().subscribe(|v| out = Some(v));
    assert_eq!(out, Some(vec![]));
  }
}
