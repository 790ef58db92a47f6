//! Library-level error values.
//!
//! Stream errors are whatever `Err` type a pipeline carries. The types here
//! are the ones the library itself produces, plus a ready-made error enum for
//! callers that do not want to define their own.

use thiserror::Error;

/// Returned as the Error signal to anyone subscribing to a disposed subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("object has been disposed")]
pub struct ObjectDisposed;

/// A concrete, cloneable stream error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RxError {
  #[error(transparent)]
  Disposed(#[from] ObjectDisposed),

  #[error("{0}")]
  Message(String),
}

impl RxError {
  pub fn msg(message: impl Into<String>) -> Self { RxError::Message(message.into()) }
}

impl From<&str> for RxError {
  fn from(message: &str) -> Self { RxError::msg(message) }
}

impl From<String> for RxError {
  fn from(message: String) -> Self { RxError::Message(message) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxlite_macro::test]
  fn display_and_conversion() {
    assert_eq!(ObjectDisposed.to_string(), "object has been disposed");
    let err: RxError = ObjectDisposed.into();
    assert_eq!(err, RxError::Disposed(ObjectDisposed));
    assert_eq!(err.to_string(), "object has been disposed");
    assert_eq!(RxError::from("boom").to_string(), "boom");
  }
}
