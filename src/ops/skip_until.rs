use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  subscription::{BoxedSubscription, ProxySubscription, Subscription, SubscriptionFlag, TupleSubscription},
  type_hint::TypeHint,
};

/// Drops source values until the trigger emits.
///
/// The trigger is subscribed first, so a trigger that fires synchronously
/// opens the gate before the source produces anything. The trigger
/// subscription is released as soon as it fires, or when the source
/// terminates. A trigger error terminates the output.
#[derive(Clone)]
pub struct SkipUntilOp<S, N, NItem> {
  source: S,
  trigger: N,
  _hint: TypeHint<NItem>,
}

impl<S, N, NItem> SkipUntilOp<S, N, NItem> {
  pub(crate) fn new(source: S, trigger: N) -> Self { SkipUntilOp { source, trigger, _hint: TypeHint::new() } }
}

impl<Item, Err, O, S, N, NItem> Observable<Item, Err, O> for SkipUntilOp<S, N, NItem>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, SkipUntilObserver<O, Item, Err>>,
  N: Observable<NItem, Err, SkipUntilNotifier<O, Item, Err>>,
  N::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<S::Unsub, ProxySubscription<BoxedSubscription>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = SharedObserver::new(observer, ());
    let open = SubscriptionFlag::default();
    let trigger = ProxySubscription::default();
    let notifier = SkipUntilNotifier { downstream: downstream.clone(), open: open.clone(), trigger: trigger.clone() };
    trigger.set(BoxedSubscription::new(self.trigger.actual_subscribe(notifier)));
    let source = self
      .source
      .actual_subscribe(SkipUntilObserver { downstream, open, trigger: trigger.clone() });
    TupleSubscription::new(source, trigger)
  }
}

impl<Item, Err, S, N, NItem> ObservableExt<Item, Err> for SkipUntilOp<S, N, NItem>
where
  S: ObservableExt<Item, Err>,
  N: ObservableExt<NItem, Err>,
{
}

pub struct SkipUntilObserver<O, Item, Err> {
  downstream: SharedObserver<O, Item, Err>,
  open: SubscriptionFlag,
  trigger: ProxySubscription<BoxedSubscription>,
}

impl<Item, Err, O> Observer<Item, Err> for SkipUntilObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.open.is_set() {
      self.downstream.next(value);
    }
  }

  fn error(self, err: Err) {
    self.downstream.error(err);
    self.trigger.unsubscribe();
  }

  fn complete(self) {
    self.downstream.complete();
    self.trigger.unsubscribe();
  }

  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}

pub struct SkipUntilNotifier<O, Item, Err> {
  downstream: SharedObserver<O, Item, Err>,
  open: SubscriptionFlag,
  trigger: ProxySubscription<BoxedSubscription>,
}

impl<NItem, Item, Err, O> Observer<NItem, Err> for SkipUntilNotifier<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, _: NItem) {
    if self.open.set() {
      tracing::trace!("skip_until trigger fired");
      self.trigger.clone().unsubscribe();
    }
  }

  fn error(self, err: Err) { self.downstream.error(err); }

  fn complete(self) {}

  fn is_finished(&self) -> bool { self.open.is_set() || self.downstream.is_finished() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{from_iter, of, ObservableExt},
    subject::PublishSubject,
  };

  #[rxlite_macro::test]
  fn forwards_after_trigger_and_releases_it() {
    let source = PublishSubject::<i32, ()>::new();
    let trigger = PublishSubject::<(), ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    source
      .clone()
      .skip_until(trigger.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    source.next(1);
    source.next(2);
    assert_eq!(trigger.subscriber_count(), 1);
    trigger.next(());
    assert_eq!(trigger.subscriber_count(), 0);
    source.next(3);
    source.next(4);
    assert_eq!(*out.lock().unwrap(), vec![3, 4]);
  }

  #[rxlite_macro::test]
  fn synchronous_trigger_opens_immediately() {
    let mut out = vec![];
    from_iter(0..3)
      .skip_until(of(()))
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![0, 1, 2]);
  }

  #[rxlite_macro::test]
  fn trigger_error_terminates() {
    let source = PublishSubject::<i32, &str>::new();
    let trigger = PublishSubject::<(), &str>::new();
    let err = Arc::new(Mutex::new(None));
    let c_err = err.clone();
    source
      .clone()
      .skip_until(trigger.clone())
      .subscribe_err(|_| {}, move |e| *c_err.lock().unwrap() = Some(e));
    trigger.error("trigger failed");
    source.next(1);
    assert_eq!(*err.lock().unwrap(), Some("trigger failed"));
  }

  #[rxlite_macro::test]
  fn trigger_completion_keeps_gate_closed() {
    let source = PublishSubject::<i32, ()>::new();
    let trigger = PublishSubject::<(), ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    source
      .clone()
      .skip_until(trigger.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    trigger.complete();
    source.next(1);
    assert!(out.lock().unwrap().is_empty());
  }

  #[rxlite_macro::test]
  fn source_completion_releases_trigger() {
    let source = PublishSubject::<i32, ()>::new();
    let trigger = PublishSubject::<(), ()>::new();
    source.clone().skip_until(trigger.clone()).subscribe(|_| {});
    assert_eq!(trigger.subscriber_count(), 1);
    source.complete();
    assert_eq!(trigger.subscriber_count(), 0);
  }
}
