use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  type_hint::TypeHint,
};

/// A cold source replaying an iterator to each subscriber, then completing.
#[derive(Clone)]
pub struct FromIter<It, Err> {
  iter: It,
  _hint: TypeHint<Err>,
}

/// Emit every item of `iter`, then complete.
pub fn from_iter<I>(iter: I) -> FromIter<I::IntoIter, Infallible>
where
  I: IntoIterator,
{
  FromIter::new(iter)
}

/// Emit `value`, then complete.
pub fn of<Item>(value: Item) -> FromIter<std::iter::Once<Item>, Infallible> { from_iter(std::iter::once(value)) }

impl<It, Err> FromIter<It, Err> {
  pub(crate) fn new<I>(iter: I) -> Self
  where
    I: IntoIterator<IntoIter = It>,
  {
    FromIter { iter: iter.into_iter(), _hint: TypeHint::new() }
  }
}

impl<It, Err, O> Observable<It::Item, Err, O> for FromIter<It, Err>
where
  It: Iterator,
  O: Observer<It::Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    let mut iter = self.iter;
    while !observer.is_finished() {
      match iter.next() {
        Some(value) => observer.next(value),
        None => return observer.complete(),
      }
    }
  }
}

impl<It, Err> ObservableExt<It::Item, Err> for FromIter<It, Err> where It: Iterator {}
