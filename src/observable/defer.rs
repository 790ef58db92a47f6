use crate::{
  observable::{Observable, ObservableExt},
  type_hint::TypeHint,
};

/// Builds a fresh observable for every subscription.
pub struct Defer<F, S> {
  factory: F,
  _hint: TypeHint<S>,
}

pub fn defer<F, S>(factory: F) -> Defer<F, S>
where
  F: FnOnce() -> S,
{
  Defer { factory, _hint: TypeHint::new() }
}

impl<F: Clone, S> Clone for Defer<F, S> {
  fn clone(&self) -> Self { Defer { factory: self.factory.clone(), _hint: TypeHint::new() } }
}

impl<Item, Err, O, F, S> Observable<Item, Err, O> for Defer<F, S>
where
  F: FnOnce() -> S,
  S: Observable<Item, Err, O>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub { (self.factory)().actual_subscribe(observer) }
}

impl<Item, Err, F, S> ObservableExt<Item, Err> for Defer<F, S>
where
  F: FnOnce() -> S,
  S: ObservableExt<Item, Err>,
{
}
