//! Error types for `logbook-core`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::ValueType;

#[derive(Debug, Error)]
pub enum Error {
  #[error("series not found: {0}")]
  SeriesNotFound(i64),

  #[error("event not found: {0}")]
  EventNotFound(i64),

  #[error("target series {0} does not exist")]
  MissingSeries(i64),

  #[error("invalid {value_type} value: {input:?}")]
  InvalidValue { value_type: ValueType, input: String },

  #[error("{0:?} is not one of the selection options")]
  NotAnOption(String),

  #[error("unknown include: {0:?}")]
  UnknownInclude(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// The coarse category of a failure, shared by every layer so the HTTP
/// boundary can map any error to a status without knowing its concrete type.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  /// The caller sent something unacceptable (bad id, missing reference).
  Validation,
  /// The addressed record does not exist.
  NotFound,
  /// Anything else: storage failures, encoding bugs.
  Internal,
}

/// JSON body of every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
  pub kind:    ErrorKind,
  pub message: String,
}

/// Implemented by every error type a [`crate::store::Delegate`] can return.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::SeriesNotFound(_) | Self::EventNotFound(_) => ErrorKind::NotFound,
      Self::MissingSeries(_)
      | Self::InvalidValue { .. }
      | Self::NotAnOption(_)
      | Self::UnknownInclude(_) => ErrorKind::Validation,
      Self::Serialization(_) => ErrorKind::Internal,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_series_is_a_validation_error_naming_the_id() {
    let err = Error::MissingSeries(42);
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "target series 42 does not exist");
  }

  #[test]
  fn kinds_serialise_in_snake_case() {
    assert_eq!(
      serde_json::to_value(ErrorKind::NotFound).unwrap(),
      serde_json::json!("not_found")
    );
    assert_eq!(ErrorKind::Internal.to_string(), "internal");
  }
}
