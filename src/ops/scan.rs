use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  type_hint::TypeHint,
};

/// Emits the running accumulator after every source value.
#[derive(Clone)]
pub struct ScanOp<S, F, Acc, Item> {
  source: S,
  func: F,
  seed: Acc,
  _hint: TypeHint<Item>,
}

impl<S, F, Acc, Item> ScanOp<S, F, Acc, Item> {
  pub(crate) fn new(source: S, seed: Acc, func: F) -> Self {
    ScanOp { source, func, seed, _hint: TypeHint::new() }
  }
}

impl<Item, Err, O, S, F, Acc> Observable<Acc, Err, O> for ScanOp<S, F, Acc, Item>
where
  O: Observer<Acc, Err>,
  S: Observable<Item, Err, ScanObserver<O, F, Acc>>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(ScanObserver { observer, func: self.func, acc: Some(self.seed) })
  }
}

impl<Item, Err, S, F, Acc> ObservableExt<Acc, Err> for ScanOp<S, F, Acc, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
}

pub struct ScanObserver<O, F, Acc> {
  observer: O,
  func: F,
  // Always `Some` between calls; taken while `func` runs.
  acc: Option<Acc>,
}

impl<Item, Err, O, F, Acc> Observer<Item, Err> for ScanObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      let acc = (self.func)(acc, value);
      self.acc = Some(acc.clone());
      self.observer.next(acc);
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

/// `scan` whose accumulator function can fail. The first `Err` terminates
/// the stream.
#[derive(Clone)]
pub struct TryScanOp<S, F, Acc, Item> {
  source: S,
  func: F,
  seed: Acc,
  _hint: TypeHint<Item>,
}

impl<S, F, Acc, Item> TryScanOp<S, F, Acc, Item> {
  pub(crate) fn new(source: S, seed: Acc, func: F) -> Self {
    TryScanOp { source, func, seed, _hint: TypeHint::new() }
  }
}

impl<Item, Err, O, S, F, Acc> Observable<Acc, Err, O> for TryScanOp<S, F, Acc, Item>
where
  O: Observer<Acc, Err>,
  S: Observable<Item, Err, TryScanObserver<O, F, Acc>>,
  F: FnMut(Acc, Item) -> Result<Acc, Err>,
  Acc: Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(TryScanObserver {
      observer: Some(observer),
      func: self.func,
      acc: Some(self.seed),
    })
  }
}

impl<Item, Err, S, F, Acc> ObservableExt<Acc, Err> for TryScanOp<S, F, Acc, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Acc, Item) -> Result<Acc, Err>,
{
}

pub struct TryScanObserver<O, F, Acc> {
  observer: Option<O>,
  func: F,
  acc: Option<Acc>,
}

impl<Item, Err, O, F, Acc> Observer<Item, Err> for TryScanObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Result<Acc, Err>,
  Acc: Clone,
{
  fn next(&mut self, value: Item) {
    let Some(acc) = self.acc.take() else { return };
    match (self.func)(acc, value) {
      Ok(acc) => {
        self.acc = Some(acc.clone());
        if let Some(observer) = self.observer.as_mut() {
          observer.next(acc);
        }
      }
      Err(err) => {
        if let Some(observer) = self.observer.take() {
          observer.error(err);
        }
      }
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
