use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  subscription::{BoxedSubscription, ProxySubscription, Subscription, TupleSubscription},
  type_hint::TypeHint,
};

/// Forwards source values until the trigger emits, then completes.
///
/// Firing completes the downstream and releases both the source and the
/// trigger. The trigger is also released when the source terminates first.
/// A trigger that only completes has no effect; a trigger error terminates
/// the output.
#[derive(Clone)]
pub struct TakeUntilOp<S, N, NItem> {
  source: S,
  trigger: N,
  _hint: TypeHint<NItem>,
}

impl<S, N, NItem> TakeUntilOp<S, N, NItem> {
  pub(crate) fn new(source: S, trigger: N) -> Self { TakeUntilOp { source, trigger, _hint: TypeHint::new() } }
}

type SourceSubscription<U> = ProxySubscription<U>;
type TriggerSubscription = ProxySubscription<BoxedSubscription>;

impl<Item, Err, O, S, N, NItem> Observable<Item, Err, O> for TakeUntilOp<S, N, NItem>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TakeUntilObserver<O, Item, Err>>,
  N: Observable<NItem, Err, TakeUntilNotifier<O, Item, Err, S::Unsub>>,
  N::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<SourceSubscription<S::Unsub>, TriggerSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = SharedObserver::new(observer, ());
    let source = SourceSubscription::default();
    let trigger = TriggerSubscription::default();
    let notifier = TakeUntilNotifier {
      downstream: downstream.clone(),
      source: source.clone(),
      trigger: trigger.clone(),
    };
    trigger.set(BoxedSubscription::new(self.trigger.actual_subscribe(notifier)));
    // Released right away if the trigger already fired.
    source.set(
      self
        .source
        .actual_subscribe(TakeUntilObserver { downstream, trigger: trigger.clone() }),
    );
    TupleSubscription::new(source, trigger)
  }
}

impl<Item, Err, S, N, NItem> ObservableExt<Item, Err> for TakeUntilOp<S, N, NItem>
where
  S: ObservableExt<Item, Err>,
  N: ObservableExt<NItem, Err>,
{
}

pub struct TakeUntilObserver<O, Item, Err> {
  downstream: SharedObserver<O, Item, Err>,
  trigger: TriggerSubscription,
}

impl<Item, Err, O> Observer<Item, Err> for TakeUntilObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.downstream.next(value) }

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

pub struct TakeUntilNotifier<O, Item, Err, U> {
  downstream: SharedObserver<O, Item, Err>,
  source: SourceSubscription<U>,
  trigger: TriggerSubscription,
}

impl<O, Item, Err, U: Subscription> TakeUntilNotifier<O, Item, Err, U> {
  fn release(&self) {
    self.source.clone().unsubscribe();
    self.trigger.clone().unsubscribe();
  }
}

impl<NItem, Item, Err, O, U> Observer<NItem, Err> for TakeUntilNotifier<O, Item, Err, U>
where
  O: Observer<Item, Err>,
  U: Subscription,
{
  fn next(&mut self, _: NItem) {
    if self.downstream.complete() {
      tracing::trace!("take_until trigger fired");
      self.release();
    }
  }

  fn error(self, err: Err) {
    if self.downstream.error(err) {
      self.release();
    }
  }

  fn complete(self) {}

  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{from_iter, ObservableExt},
    subject::PublishSubject,
  };

  #[rxlite_macro::test]
  fn completes_when_trigger_fires() {
    let source = PublishSubject::<i32, ()>::new();
    let trigger = PublishSubject::<(), ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(Mutex::new(0));
    let (c_out, c_completed) = (out.clone(), completed.clone());
    source.clone().take_until(trigger.clone()).subscribe_all(
      move |v| c_out.lock().unwrap().push(v),
      |_| {},
      move || *c_completed.lock().unwrap() += 1,
    );

    source.next(1);
    source.next(2);
    trigger.next(());
    source.next(3);
    trigger.next(());

    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
    assert_eq!(*completed.lock().unwrap(), 1);
    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(trigger.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn trigger_fired_from_callback() {
    let source = PublishSubject::<i32, ()>::new();
    let stop = PublishSubject::<(), ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(Mutex::new(0));
    let (c_out, c_completed, c_stop) = (out.clone(), completed.clone(), stop.clone());
    source.clone().take_until(stop.clone()).subscribe_all(
      move |v| {
        c_out.lock().unwrap().push(v);
        if v == 2 {
          c_stop.next(());
        }
      },
      |_| {},
      move || *c_completed.lock().unwrap() += 1,
    );

    source.next(1);
    source.next(2);
    source.next(3);
    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
    assert_eq!(*completed.lock().unwrap(), 1);
    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(stop.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn trigger_completion_is_ignored() {
    let trigger = PublishSubject::<(), ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    trigger.complete();
    from_iter(0..3)
      .map_err(|e| -> () { match e {} })
      .take_until(trigger.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(*out.lock().unwrap(), vec![0, 1, 2]);
  }

  #[rxlite_macro::test]
  fn source_completion_releases_trigger() {
    let source = PublishSubject::<i32, ()>::new();
    let trigger = PublishSubject::<(), ()>::new();
    source.clone().take_until(trigger.clone()).subscribe(|_| {});
    source.complete();
    assert_eq!(trigger.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn trigger_error_terminates() {
    let source = PublishSubject::<i32, &str>::new();
    let trigger = PublishSubject::<(), &str>::new();
    let err = Arc::new(Mutex::new(None));
    let c_err = err.clone();
    source
      .clone()
      .take_until(trigger.clone())
      .subscribe_err(|_| {}, move |e| *c_err.lock().unwrap() = Some(e));
    trigger.error("stop");
    assert_eq!(*err.lock().unwrap(), Some("stop"));
    assert_eq!(source.subscriber_count(), 0);
  }
}
