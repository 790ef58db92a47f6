use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

#[derive(Clone)]
pub struct StartWithOp<S, Item> {
  source: S,
  values: Vec<Item>,
}

impl<S, Item> StartWithOp<S, Item> {
  pub(crate) fn new(source: S, values: Vec<Item>) -> Self { StartWithOp { source, values } }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for StartWithOp<S, Item>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, O>,
{
  type Unsub = Option<S::Unsub>;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for value in self.values {
      if observer.is_finished() {
        break;
      }
      observer.next(value);
    }
    // The prefix alone may have satisfied the downstream.
    if observer.is_finished() {
      return None;
    }
    Some(self.source.actual_subscribe(observer))
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for StartWithOp<S, Item> where S: ObservableExt<Item, Err> {}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    observable::{from_iter, ObservableExt},
    subject::PublishSubject,
  };

  #[rxlite_macro::test]
  fn prefix_comes_first() {
    let mut out = String::new();
    from_iter(1..4)
      .start_with(vec![-1, 0])
      .subscribe(|v| out.push_str(&v.to_string()));
    assert_eq!(out, "-10123");
  }

  #[rxlite_macro::test]
  fn satisfied_prefix_skips_source() {
    let subject = PublishSubject::<i32, ()>::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    subject
      .clone()
      .start_with(vec![1, 2, 3])
      .take(2)
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
    assert_eq!(subject.subscriber_count(), 0);
  }
}
