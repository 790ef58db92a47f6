use super::Subscription;
use crate::rc::{MutArc, RcDeref, RcDerefMut};

enum ProxyState<U> {
  Pending,
  Ready(U),
  Closed,
}

/// A shared slot for a subscription that may not exist yet.
///
/// Synchronous sources can deliver a terminal signal, or see their downstream
/// unsubscribe, before `actual_subscribe` has returned the real subscription.
/// Whatever gets `set` after the slot closed is released on the spot.
pub struct ProxySubscription<U>(MutArc<ProxyState<U>>);

impl<U> Default for ProxySubscription<U> {
  fn default() -> Self { ProxySubscription(MutArc::own(ProxyState::Pending)) }
}

impl<U> Clone for ProxySubscription<U> {
  fn clone(&self) -> Self { ProxySubscription(self.0.clone()) }
}

impl<U: Subscription> ProxySubscription<U> {
  pub fn set(&self, subscription: U) {
    let rejected = {
      let mut state = self.0.rc_deref_mut();
      match *state {
        ProxyState::Closed => Some(subscription),
        _ => {
          *state = ProxyState::Ready(subscription);
          None
        }
      }
    };
    if let Some(subscription) = rejected {
      subscription.unsubscribe();
    }
  }
}

impl<U: Subscription> Subscription for ProxySubscription<U> {
  fn unsubscribe(self) {
    let prev = std::mem::replace(&mut *self.0.rc_deref_mut(), ProxyState::Closed);
    if let ProxyState::Ready(subscription) = prev {
      subscription.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { matches!(*self.0.rc_deref(), ProxyState::Closed) }
}
