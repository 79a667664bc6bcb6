//! The persistence traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `logbook-store-sqlite`). The API layer depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{Classify, resource::Resource, series::SeriesId};

/// The persistence object a generic CRUD handler forwards to; one per
/// resource.
///
/// All methods return `Send` futures so delegates can be shared across a
/// multi-threaded runtime (tokio with `axum`).
pub trait Delegate<R: Resource>: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  /// All records matching `query`.
  fn list(
    &self,
    query: R::Query,
  ) -> impl Future<Output = Result<Vec<R::Record>, Self::Error>> + Send + '_;

  /// Persist a new record; the store assigns its id.
  fn create(
    &self,
    input: R::Create,
  ) -> impl Future<Output = Result<R::Record, Self::Error>> + Send + '_;

  /// Apply a partial update and return the updated record.
  ///
  /// Fails with a not-found error if `id` does not exist.
  fn update(
    &self,
    id: i64,
    patch: R::Patch,
  ) -> impl Future<Output = Result<R::Record, Self::Error>> + Send + '_;

  /// Delete one record. Fails with a not-found error if `id` does not exist.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete every record matching `filter`; returns how many were removed.
  fn delete_all(
    &self,
    filter: R::Filter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}

/// Existence lookups used to validate event → series references.
pub trait SeriesDirectory: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  fn series_exists(
    &self,
    id: SeriesId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
