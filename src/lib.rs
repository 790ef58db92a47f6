//! # rxlite: a push-based reactive stream engine
//!
//! Producers push values to observers through chains of operators. Every
//! delivery happens synchronously on the thread that emitted it.
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let mut evens = vec![];
//! from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| evens.push(v));
//! assert_eq!(evens, vec![0, 4, 8, 12, 16]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] / [`ObservableExt`] | A producer description and its operators |
//! | [`Observer`] | Consumes `next`, then at most one of `error` or `complete` |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | Hot multicast hub that is both producer and consumer |
//! | [`Relay`] | A subject that can never terminate |
//!
//! ## Feature Flags
//!
//! - **`futures-bridge`** (default): `into_stream`, bridging an observable
//!   into a `futures::Stream`.
//!
//! [`Observable`]: observable::Observable
//! [`ObservableExt`]: observable::ObservableExt
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`Relay`]: subject::Relay

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod signal;
pub mod subject;
pub mod subscription;
pub mod type_hint;

pub use prelude::*;
