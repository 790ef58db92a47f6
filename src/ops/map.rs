use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  type_hint::TypeHint,
};

#[derive(Clone)]
pub struct MapOp<S, F, Item> {
  source: S,
  func: F,
  _hint: TypeHint<Item>,
}

impl<S, F, Item> MapOp<S, F, Item> {
  pub(crate) fn new(source: S, func: F) -> Self { MapOp { source, func, _hint: TypeHint::new() } }
}

impl<Item, B, Err, O, S, F> Observable<B, Err, O> for MapOp<S, F, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MapObserver<O, F>>,
  F: FnMut(Item) -> B,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(MapObserver { observer, func: self.func })
  }
}

impl<Item, B, Err, S, F> ObservableExt<B, Err> for MapOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item) -> B,
{
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, B, Err, O, F> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

/// `map` with a fallible projection.
#[derive(Clone)]
pub struct TryMapOp<S, F, Item> {
  source: S,
  func: F,
  _hint: TypeHint<Item>,
}

impl<S, F, Item> TryMapOp<S, F, Item> {
  pub(crate) fn new(source: S, func: F) -> Self { TryMapOp { source, func, _hint: TypeHint::new() } }
}

impl<Item, B, Err, O, S, F> Observable<B, Err, O> for TryMapOp<S, F, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, TryMapObserver<O, F>>,
  F: FnMut(Item) -> Result<B, Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(TryMapObserver { observer: Some(observer), func: self.func })
  }
}

impl<Item, B, Err, S, F> ObservableExt<B, Err> for TryMapOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item) -> Result<B, Err>,
{
}

pub struct TryMapObserver<O, F> {
  observer: Option<O>,
  func: F,
}

impl<Item, B, Err, O, F> Observer<Item, Err> for TryMapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> Result<B, Err>,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    match (self.func)(value) {
      Ok(v) => {
        if let Some(observer) = self.observer.as_mut() {
          observer.next(v);
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

/// Converts the error type of a stream.
#[derive(Clone)]
pub struct MapErrOp<S, F, Err> {
  source: S,
  func: F,
  _hint: TypeHint<Err>,
}

impl<S, F, Err> MapErrOp<S, F, Err> {
  pub(crate) fn new(source: S, func: F) -> Self { MapErrOp { source, func, _hint: TypeHint::new() } }
}

impl<Item, Err, E2, O, S, F> Observable<Item, E2, O> for MapErrOp<S, F, Err>
where
  O: Observer<Item, E2>,
  S: Observable<Item, Err, MapErrObserver<O, F>>,
  F: FnOnce(Err) -> E2,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(MapErrObserver { observer, func: self.func })
  }
}

impl<Item, Err, E2, S, F> ObservableExt<Item, E2> for MapErrOp<S, F, Err>
where
  S: ObservableExt<Item, Err>,
  F: FnOnce(Err) -> E2,
{
}

pub struct MapErrObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, E2, O, F> Observer<Item, Err> for MapErrObserver<O, F>
where
  O: Observer<Item, E2>,
  F: FnOnce(Err) -> E2,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(self, err: Err) { self.observer.error((self.func)(err)) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{from_iter, of, ObservableExt},
    subject::PublishSubject,
  };

  #[rxlite_macro::test]
  fn map_projects_every_value() {
    let mut sum = 0;
    from_iter(1..4).map(|v| v * 10).subscribe(|v| sum += v);
    assert_eq!(sum, 60);
  }

  #[rxlite_macro::test]
  fn map_changes_item_type() {
    let mut out = vec![];
    from_iter(vec!['a', 'b']).map(|c| c.to_string() + "!").subscribe(|s| out.push(s));
    assert_eq!(out, vec!["a!".to_string(), "b!".to_string()]);
  }

  #[rxlite_macro::test]
  fn try_map_error_terminates() {
    let mut values = vec![];
    let mut err = None;
    let mut completed = false;
    from_iter(1..6)
      .map_err(|e| -> String { match e {} })
      .try_map(|v| if v == 3 { Err(format!("bad {v}")) } else { Ok(v) })
      .subscribe_all(|v| values.push(v), |e| err = Some(e), || completed = true);

    assert_eq!(values, vec![1, 2]);
    assert_eq!(err.as_deref(), Some("bad 3"));
    assert!(!completed);
  }

  #[rxlite_macro::test]
  fn try_map_failure_detaches_from_hot_source() {
    let subject = PublishSubject::<i32, &'static str>::new();
    let errors = Arc::new(Mutex::new(vec![]));
    let c_errors = errors.clone();
    subject
      .clone()
      .try_map(|v| if v < 0 { Err("negative") } else { Ok(v) })
      .subscribe_err(|_| {}, move |e| c_errors.lock().unwrap().push(e));

    subject.next(1);
    subject.next(-1);
    assert_eq!(subject.subscriber_count(), 0);
    subject.next(-2);
    assert_eq!(*errors.lock().unwrap(), vec!["negative"]);
  }

  #[rxlite_macro::test]
  fn map_err_converts() {
    let mut seen = None;
    crate::observable::throw_err::<i32, _>(7)
      .map_err(|e: i32| e.to_string())
      .subscribe_err(|_| {}, |e| seen = Some(e));
    assert_eq!(seen.as_deref(), Some("7"));

    let mut hits = 0;
    of(1).map_err(|e| -> String { match e {} }).subscribe(|_| hits += 1);
    assert_eq!(hits, 1);
  }
}
