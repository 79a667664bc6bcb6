//! Error type for `logbook-store-sqlite`.

use logbook_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] logbook_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A stored column could not be turned back into a domain value.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("series {0} not found")]
  SeriesNotFound(i64),

  #[error("event {0} not found")]
  EventNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::SeriesNotFound(_) | Self::EventNotFound(_) => ErrorKind::NotFound,
      Self::Database(_) | Self::Json(_) | Self::Decode(_) => ErrorKind::Internal,
    }
  }
}
