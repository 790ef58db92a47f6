//! Everything needed to build and consume streams, in one import.

pub use crate::{
  error::{ObjectDisposed, RxError},
  observable::{
    concat_observables, create, defer, empty, from_iter, merge_observables, never, of, throw_err,
    BoxedObservable, Emitter, Observable, ObservableExt,
  },
  observer::{BoxedObserver, Observer, ObserverAll},
  ops::take_while::TakeBehavior,
  signal::Signal,
  subject::{
    BehaviorRelay, BehaviorSubject, PublishRelay, PublishSubject, Relay, ReplayRelay, ReplaySubject,
    Subject, SubjectObserver,
  },
  subscription::{
    BoxedSubscription, ClosureSubscription, DisposeBag, IntoBoxedSubscription, Subscription,
    SubscriptionGuard, SubscriptionHandle,
  },
};
#[cfg(feature = "futures-bridge")]
pub use crate::ops::into_stream::ObservableStream;
