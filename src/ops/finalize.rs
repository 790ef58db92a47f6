use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::{MutArc, RcDerefMut},
  subscription::Subscription,
};

/// Runs a closure once the subscription ends, whichever way it ends:
/// completion, error, or unsubscribe. Runs at most once.
#[derive(Clone)]
pub struct FinalizeOp<S, F> {
  source: S,
  func: F,
}

impl<S, F> FinalizeOp<S, F> {
  pub(crate) fn new(source: S, func: F) -> Self { FinalizeOp { source, func } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for FinalizeOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, FinalizeObserver<O, F>>,
  F: FnOnce(),
{
  type Unsub = FinalizeSubscription<S::Unsub, F>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let func = MutArc::own(Some(self.func));
    let subscription = self
      .source
      .actual_subscribe(FinalizeObserver { observer, func: func.clone() });
    FinalizeSubscription { subscription, func }
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for FinalizeOp<S, F> where S: ObservableExt<Item, Err> {}

fn run_once<F: FnOnce()>(func: &MutArc<Option<F>>) {
  let func = func.rc_deref_mut().take();
  if let Some(func) = func {
    func();
  }
}

pub struct FinalizeObserver<O, F> {
  observer: O,
  func: MutArc<Option<F>>,
}

impl<Item, Err, O, F> Observer<Item, Err> for FinalizeObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(self, err: Err) {
    self.observer.error(err);
    run_once(&self.func);
  }

  fn complete(self) {
    self.observer.complete();
    run_once(&self.func);
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

pub struct FinalizeSubscription<U, F> {
  subscription: U,
  func: MutArc<Option<F>>,
}

impl<U, F> Subscription for FinalizeSubscription<U, F>
where
  U: Subscription,
  F: FnOnce(),
{
  fn unsubscribe(self) {
    self.subscription.unsubscribe();
    run_once(&self.func);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  use crate::{
    observable::{of, ObservableExt},
    subject::PublishSubject,
    subscription::Subscription,
  };

  fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let c_count = count.clone();
    (count, move || {
      c_count.fetch_add(1, Ordering::SeqCst);
    })
  }

  #[rxlite_macro::test]
  fn on_complete() {
    let (finalized, func) = counter();
    let mut nexted = false;
    of(1).finalize(func).subscribe(|_| nexted = true);
    assert!(nexted);
    assert_eq!(finalized.load(Ordering::SeqCst), 1);
  }

  #[rxlite_macro::test]
  fn on_error() {
    let (finalized, func) = counter();
    let subject = PublishSubject::<i32, &str>::new();
    subject.clone().finalize(func).subscribe(|_| {});
    subject.next(1);
    assert_eq!(finalized.load(Ordering::SeqCst), 0);
    subject.error("oops");
    assert_eq!(finalized.load(Ordering::SeqCst), 1);
  }

  #[rxlite_macro::test]
  fn on_unsubscribe_runs_once() {
    let (finalized, func) = counter();
    let subject = PublishSubject::<i32, ()>::new();
    let handle = subject.clone().on_disposed(func).subscribe(|_| {});
    handle.clone().unsubscribe();
    handle.unsubscribe();
    subject.complete();
    assert_eq!(finalized.load(Ordering::SeqCst), 1);
  }
}
