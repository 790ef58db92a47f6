use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  type_hint::TypeHint,
};

/// Completes immediately.
pub struct Empty<Item, Err>(TypeHint<(Item, Err)>);

/// Never signals anything.
pub struct Never<Item, Err>(TypeHint<(Item, Err)>);

/// Errors immediately with `err`.
#[derive(Clone)]
pub struct Throw<Item, Err> {
  err: Err,
  _hint: TypeHint<Item>,
}

pub fn empty<Item, Err>() -> Empty<Item, Err> { Empty(TypeHint::new()) }

pub fn never<Item, Err>() -> Never<Item, Err> { Never(TypeHint::new()) }

pub fn throw_err<Item, Err>(err: Err) -> Throw<Item, Err> { Throw { err, _hint: TypeHint::new() } }

impl<Item, Err> Clone for Empty<Item, Err> {
  fn clone(&self) -> Self { empty() }
}

impl<Item, Err> Clone for Never<Item, Err> {
  fn clone(&self) -> Self { never() }
}

impl<Item, Err, O> Observable<Item, Err, O> for Empty<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.complete() }
}

impl<Item, Err, O> Observable<Item, Err, O> for Never<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, _: O) -> Self::Unsub {}
}

impl<Item, Err, O> Observable<Item, Err, O> for Throw<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.error(self.err) }
}

impl<Item, Err> ObservableExt<Item, Err> for Empty<Item, Err> {}
impl<Item, Err> ObservableExt<Item, Err> for Never<Item, Err> {}
impl<Item, Err> ObservableExt<Item, Err> for Throw<Item, Err> {}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxlite_macro::test]
  fn empty_only_completes() {
    let mut hits = 0;
    let mut completed = false;
    empty::<i32, ()>().subscribe_all(|_| hits += 1, |_| {}, || completed = true);
    assert_eq!(hits, 0);
    assert!(completed);
  }

  #[rxlite_macro::test]
  fn throw_only_errors() {
    let mut err = None;
    let mut completed = false;
    throw_err::<i32, _>("boom").subscribe_all(|_| {}, |e| err = Some(e), || completed = true);
    assert_eq!(err, Some("boom"));
    assert!(!completed);
  }

  #[rxlite_macro::test]
  fn never_is_silent() {
    let mut signals = 0;
    let handle = never::<i32, ()>().subscribe_all(|_| signals += 1, |_| signals += 1, || signals += 1);
    assert_eq!(signals, 0);
    assert!(!crate::subscription::Subscription::is_closed(&handle));
  }
}
