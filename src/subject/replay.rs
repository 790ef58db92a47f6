//! What a subject hands to an observer at subscribe time.

use std::collections::VecDeque;

/// Replay state carried by a subject.
pub trait ReplayPolicy<Item> {
  /// Whether retained values still replay once the subject terminated.
  const REPLAY_AFTER_TERMINAL: bool = false;

  fn record(&mut self, value: &Item);

  /// The values a new subscriber receives first, oldest first.
  fn replay(&self) -> Vec<Item>;

  /// Drop everything retained.
  fn clear(&mut self);
}

/// Replays nothing.
#[derive(Default, Clone, Copy, Debug)]
pub struct NoReplay;

impl<Item> ReplayPolicy<Item> for NoReplay {
  #[inline]
  fn record(&mut self, _: &Item) {}

  #[inline]
  fn replay(&self) -> Vec<Item> { Vec::new() }

  #[inline]
  fn clear(&mut self) {}
}

/// Replays the latest value.
pub struct LastValue<Item> {
  value: Item,
  cleared: bool,
}

impl<Item> LastValue<Item> {
  pub fn new(initial: Item) -> Self { LastValue { value: initial, cleared: false } }

  pub fn get(&self) -> Option<&Item> { (!self.cleared).then_some(&self.value) }

  /// The latest value, cleared or not.
  pub(crate) fn latest(&self) -> &Item { &self.value }
}

impl<Item: Clone> ReplayPolicy<Item> for LastValue<Item> {
  fn record(&mut self, value: &Item) { self.value = value.clone(); }

  fn replay(&self) -> Vec<Item> { self.get().cloned().into_iter().collect() }

  fn clear(&mut self) { self.cleared = true; }
}

/// Replays the last `capacity` values, or all of them when unbounded.
pub struct ReplayBuffer<Item> {
  buffer: VecDeque<Item>,
  capacity: Option<usize>,
}

impl<Item> ReplayBuffer<Item> {
  pub fn bounded(capacity: usize) -> Self { ReplayBuffer { buffer: VecDeque::new(), capacity: Some(capacity) } }

  pub fn unbounded() -> Self { ReplayBuffer { buffer: VecDeque::new(), capacity: None } }

  pub fn len(&self) -> usize { self.buffer.len() }

  pub fn is_empty(&self) -> bool { self.buffer.is_empty() }
}

impl<Item: Clone> ReplayPolicy<Item> for ReplayBuffer<Item> {
  const REPLAY_AFTER_TERMINAL: bool = true;

  fn record(&mut self, value: &Item) {
    if self.capacity == Some(0) {
      return;
    }
    self.buffer.push_back(value.clone());
    if let Some(capacity) = self.capacity {
      while self.buffer.len() > capacity {
        self.buffer.pop_front();
      }
    }
  }

  fn replay(&self) -> Vec<Item> { self.buffer.iter().cloned().collect() }

  fn clear(&mut self) { self.buffer = VecDeque::new(); }
}
