use std::convert::Infallible;

use super::{LastValue, NoReplay, RelayCore, ReplayBuffer, ReplayPolicy, SubjectSubscription};
use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// A subject that only accepts values.
///
/// There is no way to error, complete or dispose a relay, so it stays active
/// for as long as any handle to it exists.
pub struct Relay<Item, R = NoReplay>(RelayCore<Item, R>);

pub type PublishRelay<Item> = Relay<Item, NoReplay>;
pub type BehaviorRelay<Item> = Relay<Item, LastValue<Item>>;
pub type ReplayRelay<Item> = Relay<Item, ReplayBuffer<Item>>;

impl<Item, R> Clone for Relay<Item, R> {
  fn clone(&self) -> Self { Relay(self.0.clone()) }
}

impl<Item> Default for Relay<Item, NoReplay> {
  fn default() -> Self { Relay(RelayCore::default()) }
}

impl<Item> Relay<Item, NoReplay> {
  pub fn new() -> Self { Self::default() }
}

impl<Item> Relay<Item, LastValue<Item>> {
  pub fn new(initial: Item) -> Self { Relay(RelayCore::with_policy(LastValue::new(initial))) }

  /// The latest accepted value.
  pub fn value(&self) -> Item
  where
    Item: Clone,
  {
    self.0.core_value()
  }
}

impl<Item> Relay<Item, ReplayBuffer<Item>> {
  pub fn new(buffer_size: usize) -> Self { Relay(RelayCore::with_policy(ReplayBuffer::bounded(buffer_size))) }

  pub fn unbounded() -> Self { Relay(RelayCore::with_policy(ReplayBuffer::unbounded())) }
}

impl<Item, R> Relay<Item, R> {
  pub fn subscriber_count(&self) -> usize { self.0.subscriber_count() }
}

impl<Item, R> Relay<Item, R>
where
  Item: Clone,
  R: ReplayPolicy<Item>,
{
  /// Deliver `value` to every current observer.
  pub fn accept(&self, value: Item) { self.0.next(value) }
}

impl<Item, R, O> Observable<Item, Infallible, O> for Relay<Item, R>
where
  O: Observer<Item, Infallible> + Send + 'static,
  Item: Clone,
  R: ReplayPolicy<Item>,
{
  type Unsub = SubjectSubscription<Item, Infallible, R>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub { self.0.actual_subscribe(observer) }
}

impl<Item, R> ObservableExt<Item, Infallible> for Relay<Item, R> {}
