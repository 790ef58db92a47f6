//! Operator implementations. Each module holds one operator (or a small
//! family of them): the `XxxOp` returned by the matching
//! [`ObservableExt`](crate::observable::ObservableExt) method, plus the
//! observer it subscribes upstream with.

pub mod amb;
pub mod collect;
pub mod combine_latest;
pub mod concat;
pub mod contains;
pub mod distinct_until_changed;
pub mod element_at;
pub mod enumerate;
pub mod filter;
pub mod finalize;
pub mod ignore_elements;
#[cfg(feature = "futures-bridge")]
pub mod into_stream;
pub mod map;
pub mod materialize;
pub mod merge;
pub mod merge_all;
pub mod reduce;
pub mod scan;
pub mod skip;
pub mod skip_until;
pub mod skip_while;
pub mod start_with;
pub mod switch_on_next;
pub mod take;
pub mod take_until;
pub mod take_while;
pub mod tap;
pub mod with_latest_from;
pub mod zip;
