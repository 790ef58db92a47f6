use crate::{
  observable::{FromIter, ObservableExt},
  ops::merge_all::MergeAllOp,
};

/// Merge every observable in `sources`.
pub fn merge_observables<I, S, Item, Err>(sources: I) -> MergeAllOp<FromIter<I::IntoIter, Err>, S>
where
  I: IntoIterator<Item = S>,
  S: ObservableExt<Item, Err>,
{
  FromIter::new(sources).merge_all(usize::MAX)
}

/// Play every observable in `sources` one after another.
pub fn concat_observables<I, S, Item, Err>(sources: I) -> MergeAllOp<FromIter<I::IntoIter, Err>, S>
where
  I: IntoIterator<Item = S>,
  S: ObservableExt<Item, Err>,
{
  FromIter::new(sources).concat_all()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    observable::from_iter,
    subject::PublishSubject,
  };
  use std::sync::{Arc, Mutex};

  #[rxlite_macro::test]
  fn concat_keeps_source_order() {
    let mut values = vec![];
    let mut completed = false;
    concat_observables(vec![from_iter(0..2), from_iter(5..7)])
      .subscribe_all(|v| values.push(v), |_| {}, || completed = true);
    assert_eq!(values, vec![0, 1, 5, 6]);
    assert!(completed);
  }

  #[rxlite_macro::test]
  fn merge_interleaves_hot_sources() {
    let a = PublishSubject::<i32, ()>::new();
    let b = PublishSubject::<i32, ()>::new();
    let log = Arc::new(Mutex::new(vec![]));
    let c_log = log.clone();
    let done = Arc::new(Mutex::new(false));
    let c_done = done.clone();
    merge_observables(vec![a.clone(), b.clone()]).subscribe_all(
      move |v| c_log.lock().unwrap().push(v),
      |_| {},
      move || *c_done.lock().unwrap() = true,
    );

    a.next(1);
    b.next(2);
    a.next(3);
    a.complete();
    assert!(!*done.lock().unwrap());
    b.complete();

    assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    assert!(*done.lock().unwrap());
  }
}
