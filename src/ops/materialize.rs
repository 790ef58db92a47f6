//! Signals as values and back.

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  signal::Signal,
};

/// Turns every source signal into a `Signal` value, then completes.
/// The output never errors.
#[derive(Clone)]
pub struct MaterializeOp<S> {
  source: S,
}

impl<S> MaterializeOp<S> {
  pub(crate) fn new(source: S) -> Self { MaterializeOp { source } }
}

impl<Item, Err, O, S> Observable<Signal<Item, Err>, Err, O> for MaterializeOp<S>
where
  O: Observer<Signal<Item, Err>, Err>,
  S: Observable<Item, Err, MaterializeObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(MaterializeObserver { observer })
  }
}

impl<Item, Err, S> ObservableExt<Signal<Item, Err>, Err> for MaterializeOp<S> where
  S: ObservableExt<Item, Err>
{
}

pub struct MaterializeObserver<O> {
  observer: O,
}

impl<Item, Err, O> Observer<Item, Err> for MaterializeObserver<O>
where
  O: Observer<Signal<Item, Err>, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(Signal::Next(value)) }

  fn error(mut self, err: Err) {
    self.observer.next(Signal::Error(err));
    self.observer.complete();
  }

  fn complete(mut self) {
    self.observer.next(Signal::Completed);
    self.observer.complete();
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

/// Unwraps `Signal` values back into real signals. The first terminal
/// value ends the output, and the source is released.
#[derive(Clone)]
pub struct DematerializeOp<S> {
  source: S,
}

impl<S> DematerializeOp<S> {
  pub(crate) fn new(source: S) -> Self { DematerializeOp { source } }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for DematerializeOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Signal<Item, Err>, Err, DematerializeObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(DematerializeObserver { observer: Some(observer) })
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for DematerializeOp<S> where
  S: ObservableExt<Signal<Item, Err>, Err>
{
}

pub struct DematerializeObserver<O> {
  observer: Option<O>,
}

impl<Item, Err, O> Observer<Signal<Item, Err>, Err> for DematerializeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, signal: Signal<Item, Err>) {
    if let Some(observer) = self.observer.take() {
      self.observer = signal.accept(observer);
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

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{from_iter, ObservableExt},
    signal::Signal,
    subject::PublishSubject,
  };

  #[rxlite_macro::test]
  fn error_becomes_a_value() {
    let subject = PublishSubject::<i32, &str>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let errors = Arc::new(Mutex::new(0));
    let completed = Arc::new(Mutex::new(false));
    let (c_out, c_errors, c_completed) = (out.clone(), errors.clone(), completed.clone());
    subject.clone().materialize().subscribe_all(
      move |s| c_out.lock().unwrap().push(s),
      move |_| *c_errors.lock().unwrap() += 1,
      move || *c_completed.lock().unwrap() = true,
    );

    subject.next(1);
    subject.error("boom");

    assert_eq!(*out.lock().unwrap(), vec![Signal::Next(1), Signal::Error("boom")]);
    assert_eq!(*errors.lock().unwrap(), 0);
    assert!(*completed.lock().unwrap());
  }

  #[rxlite_macro::test]
  fn completion_becomes_a_value() {
    let mut out = vec![];
    from_iter(1..3)
      .map_err(|e| -> () { match e {} })
      .materialize()
      .subscribe(|s| out.push(s));
    assert_eq!(out, vec![Signal::Next(1), Signal::Next(2), Signal::Completed]);
  }

  #[rxlite_macro::test]
  fn dematerialize_is_the_inverse() {
    let mut out = vec![];
    let mut err = None;
    from_iter(vec![Signal::Next(1), Signal::Next(2), Signal::Error("bad"), Signal::Next(3)])
      .map_err(|e| -> &'static str { match e {} })
      .dematerialize()
      .subscribe_err(|v| out.push(v), |e| err = Some(e));
    assert_eq!(out, vec![1, 2]);
    assert_eq!(err, Some("bad"));
  }

  #[rxlite_macro::test]
  fn round_trip_keeps_signals() {
    let mut out = vec![];
    let mut completed = false;
    from_iter(1..4)
      .map_err(|e| -> () { match e {} })
      .materialize()
      .dematerialize()
      .subscribe_all(|v| out.push(v), |_| {}, || completed = true);
    assert_eq!(out, vec![1, 2, 3]);
    assert!(completed);
  }

  #[rxlite_macro::test]
  fn dematerialize_stops_pulling_after_terminal() {
    let mut pulled = 0;
    let mut completed = 0;
    from_iter(vec![Signal::Next(1), Signal::Completed, Signal::Next(2), Signal::Completed])
      .tap(|_| pulled += 1)
      .map_err(|e| -> () { match e {} })
      .dematerialize()
      .subscribe_all(|_: i32| {}, |_| {}, || completed += 1);
    assert_eq!(pulled, 2);
    assert_eq!(completed, 1);
  }
}
