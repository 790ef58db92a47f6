use smallvec::SmallVec;

use super::{BoxedSubscription, Subscription};
use crate::rc::{MutArc, RcDeref, RcDerefMut};

#[derive(Default)]
struct BagState {
  disposed: bool,
  items: SmallVec<[BoxedSubscription; 2]>,
}

/// Collects subscriptions and releases them all at once.
///
/// Dropping the bag disposes it. A subscription added after the bag was
/// disposed is released immediately instead of being kept.
#[derive(Default)]
pub struct DisposeBag(MutArc<BagState>);

impl DisposeBag {
  pub fn new() -> Self { Self::default() }

  pub fn add(&self, subscription: impl Subscription + Send + 'static) {
    let rejected = {
      let mut state = self.0.rc_deref_mut();
      if state.disposed {
        Some(subscription)
      } else {
        state.items.push(BoxedSubscription::new(subscription));
        None
      }
    };
    if let Some(subscription) = rejected {
      subscription.unsubscribe();
    }
  }

  /// Release every held subscription. Calling it again is a no-op.
  pub fn dispose(&self) {
    let items = {
      let mut state = self.0.rc_deref_mut();
      state.disposed = true;
      std::mem::take(&mut state.items)
    };
    if !items.is_empty() {
      tracing::trace!(count = items.len(), "dispose bag released");
    }
    for item in items {
      item.unsubscribe();
    }
  }

  pub fn is_disposed(&self) -> bool { self.0.rc_deref().disposed }

  pub fn len(&self) -> usize { self.0.rc_deref().items.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Subscription for DisposeBag {
  fn unsubscribe(self) { self.dispose() }

  fn is_closed(&self) -> bool { self.is_disposed() }
}

impl Drop for DisposeBag {
  fn drop(&mut self) { self.dispose() }
}
