use crate::{
  observable::{Observable, ObservableExt},
  observer::{BoxedObserver, Observer},
  subscription::BoxedSubscription,
};

/// Object-safe mirror of [`Observable`] over boxed observers.
pub trait DynObservable<Item, Err> {
  fn box_subscribe(self: Box<Self>, observer: BoxedObserver<Item, Err>) -> BoxedSubscription;
}

impl<T, Item, Err> DynObservable<Item, Err> for T
where
  T: Observable<Item, Err, BoxedObserver<Item, Err>>,
  T::Unsub: Send + 'static,
{
  fn box_subscribe(self: Box<Self>, observer: BoxedObserver<Item, Err>) -> BoxedSubscription {
    BoxedSubscription::new((*self).actual_subscribe(observer))
  }
}

/// A type-erased observable, for collections of mixed sources or for naming
/// a pipeline in a signature.
pub struct BoxedObservable<Item, Err>(Box<dyn DynObservable<Item, Err> + Send>);

impl<Item, Err> BoxedObservable<Item, Err> {
  pub fn new(source: impl DynObservable<Item, Err> + Send + 'static) -> Self {
    BoxedObservable(Box::new(source))
  }
}

impl<Item, Err, O> Observable<Item, Err, O> for BoxedObservable<Item, Err>
where
  O: Observer<Item, Err> + Send + 'static,
{
  type Unsub = BoxedSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub { self.0.box_subscribe(Box::new(observer)) }
}

impl<Item, Err> ObservableExt<Item, Err> for BoxedObservable<Item, Err> {}
