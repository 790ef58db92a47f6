use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Pairs every value with its zero-based position in the stream.
#[derive(Clone)]
pub struct EnumerateOp<S> {
  source: S,
}

impl<S> EnumerateOp<S> {
  pub(crate) fn new(source: S) -> Self { EnumerateOp { source } }
}

impl<Item, Err, O, S> Observable<(usize, Item), Err, O> for EnumerateOp<S>
where
  O: Observer<(usize, Item), Err>,
  S: Observable<Item, Err, EnumerateObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(EnumerateObserver { observer, index: 0 })
  }
}

impl<Item, Err, S> ObservableExt<(usize, Item), Err> for EnumerateOp<S> where S: ObservableExt<Item, Err> {}

pub struct EnumerateObserver<O> {
  observer: O,
  index: usize,
}

impl<Item, Err, O> Observer<Item, Err> for EnumerateObserver<O>
where
  O: Observer<(usize, Item), Err>,
{
  fn next(&mut self, value: Item) {
    let index = self.index;
    self.index += 1;
    self.observer.next((index, value));
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
