use std::collections::VecDeque;

use super::Observer;
use crate::{
  rc::{MutArc, RcDeref, RcDerefMut},
  signal::Signal,
};

/// The downstream observer of a multi-source operator, shared by all of its
/// upstream observers together with the operator's own state `St`.
///
/// No lock is held while a signal reaches the downstream. A signal raised
/// while another one is being delivered, whether by a callback on the same
/// thread or by another thread, is queued and delivered by the thread that
/// is already delivering, right after the current signal returns. So a
/// callback may feed any source of the operator it is observing, and the
/// output stays serialized.
pub struct SharedObserver<O, Item, Err, St = ()>(MutArc<Outbox<O, Item, Err, St>>);

/// The locked half of a [`SharedObserver`]: the operator state and the
/// signals waiting for delivery.
pub struct Outbox<O, Item, Err, St> {
  observer: Option<O>,
  pending: VecDeque<Signal<Item, Err>>,
  delivering: bool,
  stopped: bool,
  pub state: St,
}

impl<O, Item, Err, St> Outbox<O, Item, Err, St> {
  /// Queue a value. Ignored once a terminal signal is queued.
  pub fn push_next(&mut self, value: Item) {
    if !self.stopped {
      self.pending.push_back(Signal::Next(value));
    }
  }

  /// Queue the terminal error. Returns `true` only for the call that ends
  /// the output.
  pub fn push_error(&mut self, err: Err) -> bool { self.push_terminal(Signal::Error(err)) }

  /// Queue the completion. Returns `true` only for the call that ends the
  /// output.
  pub fn push_complete(&mut self) -> bool { self.push_terminal(Signal::Completed) }

  /// `true` once a terminal signal is queued or delivered.
  #[inline]
  pub fn is_stopped(&self) -> bool { self.stopped }

  fn push_terminal(&mut self, signal: Signal<Item, Err>) -> bool {
    if self.stopped {
      return false;
    }
    self.stopped = true;
    self.pending.push_back(signal);
    true
  }
}

impl<O, Item, Err, St> Clone for SharedObserver<O, Item, Err, St> {
  fn clone(&self) -> Self { SharedObserver(self.0.clone()) }
}

impl<O, Item, Err, St> SharedObserver<O, Item, Err, St> {
  pub fn new(observer: O, state: St) -> Self {
    SharedObserver(MutArc::own(Outbox {
      observer: Some(observer),
      pending: VecDeque::new(),
      delivering: false,
      stopped: false,
      state,
    }))
  }

  #[inline]
  pub fn is_stopped(&self) -> bool { self.0.rc_deref().stopped }
}

impl<O, Item, Err, St> SharedObserver<O, Item, Err, St>
where
  O: Observer<Item, Err>,
{
  /// Run `f` on the locked outbox, then deliver whatever it queued, unless
  /// a delivery is already running somewhere, which will pick it up.
  pub fn update<R>(&self, f: impl FnOnce(&mut Outbox<O, Item, Err, St>) -> R) -> R {
    let (ret, observer) = {
      let mut outbox = self.0.rc_deref_mut();
      let ret = f(&mut *outbox);
      if outbox.delivering || outbox.pending.is_empty() {
        return ret;
      }
      let Some(observer) = outbox.observer.take() else {
        outbox.pending.clear();
        return ret;
      };
      outbox.delivering = true;
      (ret, observer)
    };
    self.drain(observer);
    ret
  }

  pub fn next(&self, value: Item) { self.update(|outbox| outbox.push_next(value)) }

  /// Returns `true` when this call terminated the output.
  pub fn error(&self, err: Err) -> bool { self.update(|outbox| outbox.push_error(err)) }

  /// Returns `true` when this call terminated the output.
  pub fn complete(&self) -> bool { self.update(|outbox| outbox.push_complete()) }

  pub fn is_finished(&self) -> bool {
    let outbox = self.0.rc_deref();
    outbox.stopped || outbox.observer.as_ref().map_or(false, |o| o.is_finished())
  }

  fn drain(&self, mut observer: O) {
    loop {
      let signal = {
        let mut outbox = self.0.rc_deref_mut();
        match outbox.pending.pop_front() {
          Some(signal) => signal,
          None => {
            outbox.observer = Some(observer);
            outbox.delivering = false;
            return;
          }
        }
      };
      observer = match signal.accept(observer) {
        Some(observer) => observer,
        None => {
          self.0.rc_deref_mut().delivering = false;
          return;
        }
      };
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::observer::{ignore_error, BoxedObserver, ObserverAll};

  #[rxlite_macro::test]
  fn terminates_once() {
    let completions = MutArc::own(0);
    let c = completions.clone();
    let shared: SharedObserver<_, i32, ()> =
      SharedObserver::new(ObserverAll::new(|_: i32| {}, ignore_error::<()>, move || *c.rc_deref_mut() += 1), ());
    assert!(shared.complete());
    assert!(shared.is_finished());
    assert!(!shared.complete());
    shared.next(1);
    assert_eq!(*completions.rc_deref(), 1);
  }

  type Feedback = SharedObserver<BoxedObserver<i32, ()>, i32, ()>;

  #[rxlite_macro::test]
  fn signal_raised_during_delivery_is_queued() {
    let log = MutArc::own(vec![]);
    let slot: MutArc<Option<Feedback>> = MutArc::own(None);
    let (c_log, c_slot) = (log.clone(), slot.clone());
    let (d_log, d_slot) = (log.clone(), slot.clone());
    let observer: BoxedObserver<i32, ()> = Box::new(ObserverAll::new(
      move |v: i32| {
        c_log.rc_deref_mut().push(v);
        let feedback = c_slot.rc_deref().clone();
        if let (1, Some(shared)) = (v, feedback) {
          shared.next(2);
          shared.complete();
          shared.next(3);
          c_log.rc_deref_mut().push(-1);
        }
      },
      ignore_error::<()>,
      move || {
        d_log.rc_deref_mut().push(0);
        d_slot.rc_deref_mut().take();
      },
    ));
    let shared: Feedback = SharedObserver::new(observer, ());
    *slot.rc_deref_mut() = Some(shared.clone());

    shared.next(1);
    assert_eq!(*log.rc_deref(), vec![1, -1, 2, 0]);
    assert!(shared.is_stopped());
  }

  #[rxlite_macro::test]
  fn state_changes_and_signals_share_the_lock() {
    let log = MutArc::own(vec![]);
    let c_log = log.clone();
    let shared: SharedObserver<_, usize, (), usize> = SharedObserver::new(
      ObserverAll::new(move |v: usize| c_log.rc_deref_mut().push(v), ignore_error::<()>, || {}),
      0usize,
    );
    for _ in 0..3 {
      shared.update(|outbox| {
        outbox.state += 1;
        let count = outbox.state;
        outbox.push_next(count);
      });
    }
    assert_eq!(*log.rc_deref(), vec![1, 2, 3]);
  }
}
