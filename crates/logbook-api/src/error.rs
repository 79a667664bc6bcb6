//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use logbook_core::{Classify, ErrorBody, ErrorKind};
use thiserror::Error;

/// An error returned by an API handler.
///
/// Rendered as `{"kind": ..., "message": ...}` with a status derived from
/// the kind.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
  pub kind:    ErrorKind,
  pub message: String,
}

impl ApiError {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
    }
  }

  pub fn validation(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Validation, message)
  }

  /// The failure boundary: classify a delegate error and log it.
  pub fn from_delegate<E>(resource: &str, operation: &str, err: E) -> Self
  where
    E: std::error::Error + Classify,
  {
    let kind = err.kind();
    match kind {
      ErrorKind::Internal => {
        tracing::error!(resource, operation, error = %err, "delegate failed")
      }
      _ => tracing::warn!(resource, operation, %kind, error = %err, "request rejected"),
    }
    Self::new(kind, err.to_string())
  }

  pub fn status(&self) -> StatusCode {
    match self.kind {
      ErrorKind::Validation => StatusCode::BAD_REQUEST,
      ErrorKind::NotFound => StatusCode::NOT_FOUND,
      ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = ErrorBody {
      kind:    self.kind,
      message: self.message,
    };
    (status, Json(body)).into_response()
  }
}
