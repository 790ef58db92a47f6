//! One notification as a value, the element type of `materialize`.

use crate::observer::Observer;

/// `Next`, `Error` or `Completed`, reified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<Item, Err> {
  Next(Item),
  Error(Err),
  Completed,
}

impl<Item, Err> Signal<Item, Err> {
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Signal::Next(_)) }

  pub fn value(&self) -> Option<&Item> {
    match self {
      Signal::Next(v) => Some(v),
      _ => None,
    }
  }

  pub fn into_value(self) -> Option<Item> {
    match self {
      Signal::Next(v) => Some(v),
      _ => None,
    }
  }

  /// Deliver this signal to `observer`.
  ///
  /// Returns the observer back for `Next`, `None` once a terminal signal
  /// consumed it.
  pub fn accept<O>(self, mut observer: O) -> Option<O>
  where
    O: Observer<Item, Err>,
  {
    match self {
      Signal::Next(v) => {
        observer.next(v);
        Some(observer)
      }
      Signal::Error(e) => {
        observer.error(e);
        None
      }
      Signal::Completed => {
        observer.complete();
        None
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    observer::{ignore_error, ObserverAll},
    rc::{MutArc, RcDeref, RcDerefMut},
  };

  #[rxlite_macro::test]
  fn accept_stops_at_terminal() {
    let log = MutArc::own(vec![]);
    let c_log = log.clone();
    let observer = ObserverAll::new(
      move |v: i32| c_log.rc_deref_mut().push(v),
      ignore_error::<()>,
      || {},
    );
    let observer = Signal::Next(1).accept(observer);
    assert!(observer.is_some());
    let rest = observer.and_then(|o| Signal::<i32, ()>::Completed.accept(o));
    assert!(rest.is_none());
    assert_eq!(*log.rc_deref(), vec![1]);
  }

  #[rxlite_macro::test]
  fn terminal_classification() {
    assert!(!Signal::<_, ()>::Next(1).is_terminal());
    assert!(Signal::<i32, _>::Error(()).is_terminal());
    assert_eq!(Signal::<_, ()>::Next(3).into_value(), Some(3));
    assert_eq!(Signal::<i32, ()>::Completed.value(), None);
  }
}
