//! Bridge from an observable into a `futures::Stream`.
//!
//! Values are buffered until polled. The stream yields `Ok(value)` for each
//! value, one `Err(err)` for an error, and ends after either terminal signal.
//! Dropping the stream unsubscribes from the source.

use std::{
  collections::VecDeque,
  pin::Pin,
  task::{Context, Poll, Waker},
};

use futures::stream::Stream;

use crate::{
  observable::Observable,
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  subscription::{BoxedSubscription, Subscription},
};

struct StreamState<Item, Err> {
  queue: VecDeque<Result<Item, Err>>,
  waker: Option<Waker>,
  closed: bool,
}

impl<Item, Err> StreamState<Item, Err> {
  fn push(&mut self, signal: Option<Result<Item, Err>>) {
    match signal {
      Some(signal) => self.queue.push_back(signal),
      None => self.closed = true,
    }
    if let Some(waker) = self.waker.take() {
      waker.wake();
    }
  }
}

pub struct ObservableStream<Item, Err> {
  state: MutArc<StreamState<Item, Err>>,
  unsub: Option<BoxedSubscription>,
}

impl<Item, Err> ObservableStream<Item, Err> {
  pub(crate) fn new<S>(source: S) -> Self
  where
    S: Observable<Item, Err, StreamObserver<Item, Err>>,
    S::Unsub: Send + 'static,
  {
    let state = MutArc::own(StreamState { queue: VecDeque::new(), waker: None, closed: false });
    let unsub = source.actual_subscribe(StreamObserver { state: state.clone() });
    ObservableStream { state, unsub: Some(BoxedSubscription::new(unsub)) }
  }
}

impl<Item, Err> Stream for ObservableStream<Item, Err> {
  type Item = Result<Item, Err>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let mut state = self.state.rc_deref_mut();
    if let Some(item) = state.queue.pop_front() {
      return Poll::Ready(Some(item));
    }
    if state.closed {
      return Poll::Ready(None);
    }
    state.waker = Some(cx.waker().clone());
    Poll::Pending
  }
}

impl<Item, Err> Drop for ObservableStream<Item, Err> {
  fn drop(&mut self) {
    if let Some(unsub) = self.unsub.take() {
      unsub.unsubscribe();
    }
  }
}

#[doc(hidden)]
pub struct StreamObserver<Item, Err> {
  state: MutArc<StreamState<Item, Err>>,
}

impl<Item, Err> Observer<Item, Err> for StreamObserver<Item, Err> {
  fn next(&mut self, value: Item) { self.state.rc_deref_mut().push(Some(Ok(value))); }

  fn error(self, err: Err) {
    let mut state = self.state.rc_deref_mut();
    state.push(Some(Err(err)));
    state.push(None);
  }

  fn complete(self) { self.state.rc_deref_mut().push(None); }

  fn is_finished(&self) -> bool { self.state.rc_deref().closed }
}

#[cfg(test)]
mod tests {
  use futures::StreamExt;

  use crate::{
    observable::{from_iter, throw_err, ObservableExt},
    subject::PublishSubject,
  };

  #[rxlite_macro::test]
  async fn yields_every_value() {
    let mut stream = from_iter(vec![1, 2, 3]).into_stream();
    let mut values = vec![];
    while let Some(Ok(v)) = stream.next().await {
      values.push(v);
    }
    assert_eq!(values, vec![1, 2, 3]);
  }

  #[rxlite_macro::test]
  async fn error_ends_the_stream() {
    let mut stream = throw_err::<i32, _>("boom").into_stream();
    assert_eq!(stream.next().await, Some(Err("boom")));
    assert_eq!(stream.next().await, None);
  }

  #[rxlite_macro::test(threads)]
  async fn receives_values_pushed_from_another_task() {
    let subject = PublishSubject::<i32, ()>::new();
    let stream = subject.clone().into_stream();
    let feeder = tokio::spawn(async move {
      subject.next(1);
      subject.next(2);
      subject.complete();
    });
    let values: Vec<_> = stream.collect().await;
    feeder.await.unwrap();
    assert_eq!(values, vec![Ok(1), Ok(2)]);
  }

  #[rxlite_macro::test]
  async fn dropping_the_stream_unsubscribes() {
    let subject = PublishSubject::<i32, ()>::new();
    let stream = subject.clone().into_stream();
    assert_eq!(subject.subscriber_count(), 1);
    drop(stream);
    assert_eq!(subject.subscriber_count(), 0);
  }
}
