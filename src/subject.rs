//! Subjects: hot observables that are also observers, multicasting every
//! signal they receive to every observer currently subscribed.
//!
//! All variants share [`Subject`] and differ only in their
//! [`ReplayPolicy`]:
//!
//! - [`PublishSubject`] replays nothing.
//! - [`BehaviorSubject`] replays the latest value.
//! - [`ReplaySubject`] replays the last `n` values, and keeps doing so after
//!   it terminated.
//!
//! # Re-entrancy
//!
//! Emitting (`next`/`error`/`complete`) into a subject from inside one of its
//! own callbacks panics. Subscribing and unsubscribing from inside a callback
//! is fine: an observer unsubscribed mid-emission receives nothing more, and
//! an observer subscribed mid-emission starts with the next emission.
//!
//! # Threads
//!
//! A subject may be fed from several threads. Emissions are serialized, so
//! each signal reaches every observer, in subscription order, before the next
//! signal is accepted.

use std::{
  convert::Infallible,
  sync::MutexGuard,
  thread::{self, ThreadId},
};

use crate::{
  error::ObjectDisposed,
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
};

mod relay;
mod replay;
mod subscribers;

pub use relay::*;
pub use replay::*;
pub use subscribers::SubjectSubscription;
use subscribers::{ObserverEntry, Subscribers};

const REENTRANT_EMISSION: &str = "re-entrant Subject emissions are not supported \
                                  (next/error/complete). Emit from outside the subject's own \
                                  callbacks.";

#[derive(Clone)]
enum Terminal<Err> {
  Active,
  Completed,
  Errored(Err),
}

pub struct SubjectCore<Item, Err, R> {
  observers: Subscribers<Item, Err>,
  terminal: Terminal<Err>,
  replay: R,
  disposed: bool,
  emitting: Option<ThreadId>,
}

/// A multicast hub. Cloning yields another handle to the same subject.
pub struct Subject<Item, Err, R = NoReplay> {
  core: MutArc<SubjectCore<Item, Err, R>>,
  gate: MutArc<()>,
}

pub type PublishSubject<Item, Err> = Subject<Item, Err, NoReplay>;
pub type BehaviorSubject<Item, Err> = Subject<Item, Err, LastValue<Item>>;
pub type ReplaySubject<Item, Err> = Subject<Item, Err, ReplayBuffer<Item>>;

impl<Item, Err, R> Clone for Subject<Item, Err, R> {
  fn clone(&self) -> Self { Subject { core: self.core.clone(), gate: self.gate.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err, NoReplay> {
  fn default() -> Self { Self::with_policy(NoReplay) }
}

impl<Item, Err> Subject<Item, Err, NoReplay> {
  pub fn new() -> Self { Self::default() }
}

impl<Item, Err> Subject<Item, Err, LastValue<Item>> {
  /// A subject replaying its latest value, starting with `initial`.
  pub fn new(initial: Item) -> Self { Self::with_policy(LastValue::new(initial)) }

  /// The latest value, or `None` once disposed.
  pub fn value(&self) -> Option<Item>
  where
    Item: Clone,
  {
    self.core.rc_deref().replay.get().cloned()
  }
}

impl<Item, Err> Subject<Item, Err, ReplayBuffer<Item>> {
  /// A subject replaying up to `buffer_size` of its latest values.
  pub fn new(buffer_size: usize) -> Self { Self::with_policy(ReplayBuffer::bounded(buffer_size)) }

  /// A subject replaying every value it ever received.
  pub fn unbounded() -> Self { Self::with_policy(ReplayBuffer::unbounded()) }
}

/// Clears the emitting mark, then releases the gate.
struct Emission<'a, Item, Err, R> {
  core: &'a MutArc<SubjectCore<Item, Err, R>>,
  _gate: MutexGuard<'a, ()>,
}

impl<Item, Err, R> Drop for Emission<'_, Item, Err, R> {
  fn drop(&mut self) { self.core.rc_deref_mut().emitting = None; }
}

impl<Item, Err, R> Subject<Item, Err, R> {
  pub(crate) fn with_policy(replay: R) -> Self {
    Subject {
      core: MutArc::own(SubjectCore {
        observers: Subscribers::default(),
        terminal: Terminal::Active,
        replay,
        disposed: false,
        emitting: None,
      }),
      gate: MutArc::own(()),
    }
  }

  pub fn subscriber_count(&self) -> usize { self.core.rc_deref().observers.len() }

  pub fn is_empty(&self) -> bool { self.subscriber_count() == 0 }

  /// `true` once the subject completed, errored or was disposed.
  pub fn is_terminated(&self) -> bool { !matches!(self.core.rc_deref().terminal, Terminal::Active) }

  pub fn is_disposed(&self) -> bool { self.core.rc_deref().disposed }

  fn emitting_here(&self) -> bool { self.core.rc_deref().emitting == Some(thread::current().id()) }

  fn begin_emission(&self) -> Emission<'_, Item, Err, R> {
    if self.emitting_here() {
      panic!("{}", REENTRANT_EMISSION);
    }
    let gate = self.gate.rc_deref_mut();
    self.core.rc_deref_mut().emitting = Some(thread::current().id());
    Emission { core: &self.core, _gate: gate }
  }

  /// Run `f` serialized against emissions from other threads. On the
  /// emitting thread itself the gate is already held.
  fn with_gate<T>(&self, f: impl FnOnce() -> T) -> T {
    if self.emitting_here() {
      f()
    } else {
      let _gate = self.gate.rc_deref_mut();
      f()
    }
  }
}

impl<Item, Err, R> Subject<Item, Err, R>
where
  Item: Clone,
  Err: Clone,
  R: ReplayPolicy<Item>,
{
  /// Deliver `value` to every current observer. Ignored once terminated.
  pub fn next(&self, value: Item) {
    let _emission = self.begin_emission();
    let entries = {
      let mut core = self.core.rc_deref_mut();
      if !matches!(core.terminal, Terminal::Active) {
        return;
      }
      core.replay.record(&value);
      core.observers.snapshot()
    };

    let mut stale = false;
    if let Some((last, rest)) = entries.split_last() {
      for entry in rest {
        stale |= !entry.next(value.clone());
      }
      stale |= !last.next(value);
    }
    if stale {
      self.core.rc_deref_mut().observers.prune();
    }
  }

  /// Terminate with `err`. Ignored once terminated.
  pub fn error(&self, err: Err) {
    let _emission = self.begin_emission();
    let entries = {
      let mut core = self.core.rc_deref_mut();
      if !matches!(core.terminal, Terminal::Active) {
        return;
      }
      core.terminal = Terminal::Errored(err.clone());
      core.observers.drain()
    };
    tracing::debug!(observers = entries.len(), "subject errored");
    for entry in entries {
      entry.error(err.clone());
    }
  }

  /// Terminate successfully. Ignored once terminated.
  pub fn complete(&self) {
    let _emission = self.begin_emission();
    let entries = {
      let mut core = self.core.rc_deref_mut();
      if !matches!(core.terminal, Terminal::Active) {
        return;
      }
      core.terminal = Terminal::Completed;
      core.observers.drain()
    };
    tracing::debug!(observers = entries.len(), "subject completed");
    for entry in entries {
      entry.complete();
    }
  }

  /// Replay to `entry` and, while active, register it. Returns the registry
  /// id, or `None` when the entry is already done.
  fn attach(&self, entry: &ObserverEntry<Item, Err>) -> Option<usize> {
    let (replay, terminal) = {
      let core = self.core.rc_deref();
      let terminal = core.terminal.clone();
      let replay = match terminal {
        Terminal::Active => core.replay.replay(),
        _ if R::REPLAY_AFTER_TERMINAL => core.replay.replay(),
        _ => Vec::new(),
      };
      (replay, terminal)
    };

    for value in replay {
      if !entry.next(value) {
        break;
      }
    }

    match terminal {
      Terminal::Active if entry.is_closed() => None,
      Terminal::Active => Some(self.core.rc_deref_mut().observers.add(entry.clone())),
      Terminal::Completed => {
        tracing::trace!("subscribed to a completed subject");
        entry.complete();
        None
      }
      Terminal::Errored(err) => {
        tracing::trace!("subscribed to an errored subject");
        entry.error(err);
        None
      }
    }
  }
}

impl<Item, Err, R> Subject<Item, Err, R>
where
  Err: From<ObjectDisposed>,
  R: ReplayPolicy<Item>,
{
  /// Drop every observer without notifying it and release the replay state.
  ///
  /// From then on, emissions are ignored and every new subscriber receives
  /// [`ObjectDisposed`] as its Error signal.
  pub fn dispose(&self) {
    let entries = {
      let mut core = self.core.rc_deref_mut();
      if core.disposed {
        return;
      }
      core.disposed = true;
      core.terminal = Terminal::Errored(ObjectDisposed.into());
      core.replay.clear();
      core.observers.drain()
    };
    tracing::debug!(observers = entries.len(), "subject disposed");
    for entry in &entries {
      entry.closed.set();
    }
  }
}

impl<Item, Err, R, O> Observable<Item, Err, O> for Subject<Item, Err, R>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Clone,
  Err: Clone,
  R: ReplayPolicy<Item>,
{
  type Unsub = SubjectSubscription<Item, Err, R>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let entry = ObserverEntry::new(Box::new(observer));
    let id = self.with_gate(|| self.attach(&entry));
    SubjectSubscription::new(self.core.downgrade(), id, entry.closed.clone())
  }
}

impl<Item, Err, R> ObservableExt<Item, Err> for Subject<Item, Err, R> {}

/// The observer face of a subject, for feeding it from another stream.
///
/// Kept separate from [`Subject`] itself so that calling `complete()` or
/// `error()` on a subject never resolves to a consuming trait method.
pub struct SubjectObserver<Item, Err, R>(Subject<Item, Err, R>);

impl<Item, Err, R> Subject<Item, Err, R> {
  pub fn as_observer(&self) -> SubjectObserver<Item, Err, R> { SubjectObserver(self.clone()) }
}

impl<Item, Err, R> Observer<Item, Err> for SubjectObserver<Item, Err, R>
where
  Item: Clone,
  Err: Clone,
  R: ReplayPolicy<Item>,
{
  fn next(&mut self, value: Item) { self.0.next(value) }

  fn error(self, err: Err) { self.0.error(err) }

  fn complete(self) { self.0.complete() }

  fn is_finished(&self) -> bool { self.0.is_terminated() }
}

/// Relays never terminate, so their subject core never needs the error type.
pub(crate) type RelayCore<Item, R> = Subject<Item, Infallible, R>;

impl<Item: Clone> RelayCore<Item, LastValue<Item>> {
  /// Relays are never disposed, so the latest value is always there.
  pub(crate) fn core_value(&self) -> Item {
    let core = self.core.rc_deref();
    core.replay.latest().clone()
  }
}
