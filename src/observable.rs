//! The producer side: [`Observable`], its extension trait hosting every
//! operator, and the factory functions.

use crate::{
  observer::{ignore_complete, ignore_error, Observer, ObserverAll, Subscriber},
  ops::{
    amb::AmbOp,
    collect::CollectOp,
    combine_latest::CombineLatestOp,
    concat::ConcatOp,
    contains::ContainsOp,
    distinct_until_changed::DistinctUntilChangedOp,
    element_at::ElementAtOp,
    enumerate::EnumerateOp,
    filter::FilterOp,
    finalize::FinalizeOp,
    ignore_elements::IgnoreElementsOp,
    map::{MapErrOp, MapOp, TryMapOp},
    materialize::{DematerializeOp, MaterializeOp},
    merge::MergeOp,
    merge_all::MergeAllOp,
    reduce::ReduceOp,
    scan::{ScanOp, TryScanOp},
    skip::SkipOp,
    skip_until::SkipUntilOp,
    skip_while::SkipWhileOp,
    start_with::StartWithOp,
    switch_on_next::SwitchOnNextOp,
    take::TakeOp,
    take_until::TakeUntilOp,
    take_while::{TakeBehavior, TakeWhileOp},
    tap::TapOp,
    with_latest_from::WithLatestFromOp,
    zip::ZipOp,
  },
  signal::Signal,
  subscription::{BoxedSubscription, ProxySubscription, Subscription, SubscriptionFlag, SubscriptionHandle},
};

mod boxed;
mod combined;
mod create;
mod defer;
mod from_iter;
mod trivial;

pub use boxed::*;
pub use combined::*;
pub use create::*;
pub use defer::*;
pub use from_iter::*;
pub use trivial::*;

/// A description of how to notify an observer of type `O`.
///
/// Subscribing consumes the observable. Observables that can be subscribed
/// more than once are `Clone`, and every clone starts from scratch.
pub trait Observable<Item, Err, O> {
  type Unsub: Subscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// The upstream subscription `subscribe_with(observer)` holds for `S`.
pub type UnsubOf<S, Item, Err, O> = <S as Observable<Item, Err, Subscriber<O>>>::Unsub;

/// The handle type `subscribe_with(observer)` returns for `S`.
pub type HandleOf<S, Item, Err, O> = SubscriptionHandle<UnsubOf<S, Item, Err, O>>;

type NextOnly<N, Err> = ObserverAll<N, fn(Err), fn()>;
type NextAndError<N, E> = ObserverAll<N, E, fn()>;

pub trait ObservableExt<Item, Err>: Sized {
  /// Subscribe with a full observer.
  ///
  /// The upstream subscription is released by the handle, or by the first
  /// terminal signal that reaches `observer`, whichever comes first.
  fn subscribe_with<O>(self, observer: O) -> HandleOf<Self, Item, Err, O>
  where
    O: Observer<Item, Err>,
    Self: Observable<Item, Err, Subscriber<O>>,
    UnsubOf<Self, Item, Err, O>: Send + 'static,
  {
    let closed = SubscriptionFlag::default();
    let source = ProxySubscription::default();
    let upstream = ProxySubscription::default();
    let unsub = self.actual_subscribe(Subscriber::new(observer, closed.clone(), upstream.clone()));
    source.set(unsub);
    // Released on the spot when a terminal arrived during subscribe.
    upstream.set(BoxedSubscription::new(source.clone()));
    SubscriptionHandle::new(closed, source)
  }

  /// Subscribe to values only. Errors are dropped.
  fn subscribe<N>(self, next: N) -> HandleOf<Self, Item, Err, NextOnly<N, Err>>
  where
    N: FnMut(Item),
    Self: Observable<Item, Err, Subscriber<NextOnly<N, Err>>>,
    UnsubOf<Self, Item, Err, NextOnly<N, Err>>: Send + 'static,
  {
    let error: fn(Err) = ignore_error::<Err>;
    let complete: fn() = ignore_complete;
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  fn subscribe_err<N, E>(self, next: N, error: E) -> HandleOf<Self, Item, Err, NextAndError<N, E>>
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    Self: Observable<Item, Err, Subscriber<NextAndError<N, E>>>,
    UnsubOf<Self, Item, Err, NextAndError<N, E>>: Send + 'static,
  {
    let complete: fn() = ignore_complete;
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  fn subscribe_all<N, E, C>(
    self, next: N, error: E, complete: C,
  ) -> HandleOf<Self, Item, Err, ObserverAll<N, E, C>>
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    C: FnOnce(),
    Self: Observable<Item, Err, Subscriber<ObserverAll<N, E, C>>>,
    UnsubOf<Self, Item, Err, ObserverAll<N, E, C>>: Send + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  // ---- transforming ----

  /// Forward `f(value)` for every value.
  fn map<B, F>(self, f: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp::new(self, f)
  }

  /// Pair every value with its zero-based index, counted per subscription.
  fn enumerate(self) -> EnumerateOp<Self> { EnumerateOp::new(self) }

  /// Like `map`, but an `Err` returned by `f` terminates the stream with
  /// that error.
  fn try_map<B, F>(self, f: F) -> TryMapOp<Self, F, Item>
  where
    F: FnMut(Item) -> Result<B, Err>,
  {
    TryMapOp::new(self, f)
  }

  /// Convert the error type. `map_err(|e| match e {})` lifts an infallible
  /// source into any error type.
  fn map_err<E2, F>(self, f: F) -> MapErrOp<Self, F, Err>
  where
    F: FnOnce(Err) -> E2,
  {
    MapErrOp::new(self, f)
  }

  /// Emit the running accumulator after each value. The seed itself is
  /// never emitted.
  fn scan<Acc, F>(self, seed: Acc, f: F) -> ScanOp<Self, F, Acc, Item>
  where
    F: FnMut(Acc, Item) -> Acc,
    Acc: Clone,
  {
    ScanOp::new(self, seed, f)
  }

  fn try_scan<Acc, F>(self, seed: Acc, f: F) -> TryScanOp<Self, F, Acc, Item>
  where
    F: FnMut(Acc, Item) -> Result<Acc, Err>,
    Acc: Clone,
  {
    TryScanOp::new(self, seed, f)
  }

  /// Emit the final accumulator once the source completes.
  fn reduce<Acc, F>(self, seed: Acc, f: F) -> ReduceOp<Self, F, Acc, Item>
  where
    F: FnMut(Acc, Item) -> Acc,
  {
    ReduceOp::new(self, seed, f)
  }

  /// Project every value into an observable and merge them all.
  fn flat_map<Inner, F>(self, f: F) -> MergeAllOp<MapOp<Self, F, Item>, Inner>
  where
    F: FnMut(Item) -> Inner,
  {
    self.map(f).merge_all(usize::MAX)
  }

  fn try_flat_map<Inner, F>(self, f: F) -> MergeAllOp<TryMapOp<Self, F, Item>, Inner>
  where
    F: FnMut(Item) -> Result<Inner, Err>,
  {
    self.try_map(f).merge_all(usize::MAX)
  }

  /// Project every value into an observable, following only the latest.
  fn flat_map_latest<Inner, F>(self, f: F) -> SwitchOnNextOp<MapOp<Self, F, Item>, Inner>
  where
    F: FnMut(Item) -> Inner,
  {
    self.map(f).switch_on_next()
  }

  #[inline]
  fn switch_map<Inner, F>(self, f: F) -> SwitchOnNextOp<MapOp<Self, F, Item>, Inner>
  where
    F: FnMut(Item) -> Inner,
  {
    self.flat_map_latest(f)
  }

  /// Project every value into an observable and play them one after another.
  fn concat_map<Inner, F>(self, f: F) -> MergeAllOp<MapOp<Self, F, Item>, Inner>
  where
    F: FnMut(Item) -> Inner,
  {
    self.map(f).concat_all()
  }

  /// Turn every signal into a `Signal` value. The result never errors.
  fn materialize(self) -> MaterializeOp<Self> { MaterializeOp::new(self) }

  /// Inverse of [`materialize`](ObservableExt::materialize).
  fn dematerialize<T>(self) -> DematerializeOp<Self>
  where
    Self: ObservableExt<Signal<T, Err>, Err>,
  {
    DematerializeOp::new(self)
  }

  // ---- filtering ----

  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    FilterOp::new(self, predicate)
  }

  /// Drop the first `count` values.
  fn skip(self, count: usize) -> SkipOp<Self> { SkipOp::new(self, count) }

  /// Drop values while `predicate` holds; forward everything from the first
  /// value that fails it.
  fn skip_while<F>(self, predicate: F) -> SkipWhileOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    SkipWhileOp::new(self, predicate)
  }

  /// Drop values until `trigger` emits.
  fn skip_until<N, NItem>(self, trigger: N) -> SkipUntilOp<Self, N, NItem>
  where
    N: ObservableExt<NItem, Err>,
  {
    SkipUntilOp::new(self, trigger)
  }

  /// Forward the first `count` values, then complete.
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp::new(self, count) }

  /// Forward values while `predicate` holds; complete on the first that
  /// fails it, without forwarding it.
  fn take_while<F>(self, predicate: F) -> TakeWhileOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    TakeWhileOp::new(self, predicate, false, false)
  }

  /// Like `take_while`, but the first failing value is forwarded before
  /// completing.
  fn take_while_inclusive<F>(self, predicate: F) -> TakeWhileOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    TakeWhileOp::new(self, predicate, true, false)
  }

  /// Forward values until one satisfies `predicate`, then complete.
  /// `behavior` decides whether that value is forwarded.
  fn take_until_predicate<F>(self, predicate: F, behavior: TakeBehavior) -> TakeWhileOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    TakeWhileOp::new(self, predicate, behavior == TakeBehavior::Inclusive, true)
  }

  /// Forward values until `trigger` emits, then complete.
  fn take_until<N, NItem>(self, trigger: N) -> TakeUntilOp<Self, N, NItem>
  where
    N: ObservableExt<NItem, Err>,
  {
    TakeUntilOp::new(self, trigger)
  }

  /// Drop values equal to the one forwarded just before.
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self, fn(&Item, &Item) -> bool>
  where
    Item: PartialEq + Clone,
  {
    let eq: fn(&Item, &Item) -> bool = <Item as PartialEq>::eq;
    DistinctUntilChangedOp::new(self, eq)
  }

  /// Like `distinct_until_changed`, comparing with `eq`.
  fn distinct_until_changed_by<F>(self, eq: F) -> DistinctUntilChangedOp<Self, F>
  where
    F: FnMut(&Item, &Item) -> bool,
    Item: Clone,
  {
    DistinctUntilChangedOp::new(self, eq)
  }

  fn ignore_elements(self) -> IgnoreElementsOp<Self> { IgnoreElementsOp::new(self) }

  /// Forward only the value at `index`, then complete.
  fn element_at(self, index: usize) -> ElementAtOp<Self> { ElementAtOp::new(self, index) }

  // ---- combining ----

  /// Play `other` after `self` completes.
  fn concat<S>(self, other: S) -> ConcatOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
  {
    ConcatOp::new(self, other)
  }

  fn merge<S>(self, other: S) -> MergeOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
  {
    MergeOp::new(self, other)
  }

  /// Flatten an observable of observables, keeping at most `concurrent`
  /// inner subscriptions alive and queueing the rest.
  fn merge_all(self, concurrent: usize) -> MergeAllOp<Self, Item> { MergeAllOp::new(self, concurrent) }

  fn concat_all(self) -> MergeAllOp<Self, Item> { self.merge_all(1) }

  /// Flatten an observable of observables, following only the latest.
  fn switch_on_next(self) -> SwitchOnNextOp<Self, Item> { SwitchOnNextOp::new(self) }

  /// Pair values by index.
  fn zip<S, B>(self, other: S) -> ZipOp<Self, S>
  where
    S: ObservableExt<B, Err>,
  {
    ZipOp::new(self, other)
  }

  /// Emit `f(a, b)` over the latest value of each source, once both have
  /// emitted.
  fn combine_latest<S, B, Out, F>(self, other: S, f: F) -> CombineLatestOp<Self, S, F, Item, B>
  where
    S: ObservableExt<B, Err>,
    F: FnMut(Item, B) -> Out,
  {
    CombineLatestOp::new(self, other, f)
  }

  /// Mirror whichever source signals first.
  fn amb<S>(self, other: S) -> AmbOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
  {
    AmbOp::new(self, other)
  }

  /// Pair every value of `self` with the latest value of `other`.
  fn with_latest_from<S, B>(self, other: S) -> WithLatestFromOp<Self, S>
  where
    S: ObservableExt<B, Err>,
  {
    WithLatestFromOp::new(self, other)
  }

  /// Emit `values` before the source's own values.
  fn start_with(self, values: Vec<Item>) -> StartWithOp<Self, Item> { StartWithOp::new(self, values) }

  // ---- aggregating ----

  /// Emit every value as one `Vec` once the source completes.
  fn collect(self) -> CollectOp<Self> { CollectOp::new(self) }

  /// Emit whether `target` occurs, as soon as that is known.
  fn contains(self, target: Item) -> ContainsOp<Self, Item>
  where
    Item: PartialEq,
  {
    ContainsOp::new(self, target)
  }

  // ---- utility ----

  /// Call `f` with every value before forwarding it.
  fn tap<F>(self, f: F) -> TapOp<Self, F>
  where
    F: FnMut(&Item),
  {
    TapOp::new(self, f)
  }

  /// Run `f` once the subscription ends, by completion, error or
  /// unsubscribe.
  fn finalize<F>(self, f: F) -> FinalizeOp<Self, F>
  where
    F: FnOnce(),
  {
    FinalizeOp::new(self, f)
  }

  #[inline]
  fn on_disposed<F>(self, f: F) -> FinalizeOp<Self, F>
  where
    F: FnOnce(),
  {
    self.finalize(f)
  }

  /// Erase the concrete type.
  fn box_it(self) -> BoxedObservable<Item, Err>
  where
    Self: DynObservable<Item, Err> + Send + 'static,
  {
    BoxedObservable::new(self)
  }

  /// Bridge into a `futures::Stream` of `Result<Item, Err>`.
  #[cfg(feature = "futures-bridge")]
  fn into_stream(self) -> crate::ops::into_stream::ObservableStream<Item, Err>
  where
    Self: Observable<Item, Err, crate::ops::into_stream::StreamObserver<Item, Err>>,
    <Self as Observable<Item, Err, crate::ops::into_stream::StreamObserver<Item, Err>>>::Unsub:
      Send + 'static,
  {
    crate::ops::into_stream::ObservableStream::new(self)
  }
}
