use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  type_hint::TypeHint,
};

/// Folds every source value into an accumulator and emits it once, on
/// completion. An empty source emits the seed; a source that never
/// completes emits nothing.
#[derive(Clone)]
pub struct ReduceOp<S, F, Acc, Item> {
  source: S,
  func: F,
  seed: Acc,
  _hint: TypeHint<Item>,
}

impl<S, F, Acc, Item> ReduceOp<S, F, Acc, Item> {
  pub(crate) fn new(source: S, seed: Acc, func: F) -> Self {
    ReduceOp { source, func, seed, _hint: TypeHint::new() }
  }
}

impl<Item, Err, O, S, F, Acc> Observable<Acc, Err, O> for ReduceOp<S, F, Acc, Item>
where
  O: Observer<Acc, Err>,
  S: Observable<Item, Err, ReduceObserver<O, F, Acc>>,
  F: FnMut(Acc, Item) -> Acc,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(ReduceObserver { observer, func: self.func, acc: Some(self.seed) })
  }
}

impl<Item, Err, S, F, Acc> ObservableExt<Acc, Err> for ReduceOp<S, F, Acc, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
}

pub struct ReduceObserver<O, F, Acc> {
  observer: O,
  func: F,
  acc: Option<Acc>,
}

impl<Item, Err, O, F, Acc> Observer<Item, Err> for ReduceObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      self.acc = Some((self.func)(acc, value));
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(mut self) {
    if let Some(acc) = self.acc.take() {
      self.observer.next(acc);
    }
    self.observer.complete();
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
