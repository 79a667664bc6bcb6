//! The [`Controller`] trait: the five CRUD operations as seen by the HTTP
//! handlers.
//!
//! Implementations compose by value. [`Crud`](crate::crud::Crud) talks to a
//! delegate, [`EventController`](crate::events::EventController) adds
//! reference checks and [`Logged`](crate::logging::Logged) records each call.

use std::future::Future;

use logbook_core::resource::Resource;

use crate::{error::ApiError, extract::RequestInfo};

pub trait Controller<R: Resource>: Send + Sync + 'static {
  fn list(
    &self,
    req: &RequestInfo,
    query: R::Query,
  ) -> impl Future<Output = Result<Vec<R::Record>, ApiError>> + Send;

  fn create(
    &self,
    req: &RequestInfo,
    input: R::Create,
  ) -> impl Future<Output = Result<R::Record, ApiError>> + Send;

  fn update(
    &self,
    req: &RequestInfo,
    id: i64,
    patch: R::Patch,
  ) -> impl Future<Output = Result<R::Record, ApiError>> + Send;

  fn delete(
    &self,
    req: &RequestInfo,
    id: i64,
  ) -> impl Future<Output = Result<(), ApiError>> + Send;

  /// Returns how many records were removed.
  fn delete_all(
    &self,
    req: &RequestInfo,
    filter: R::Filter,
  ) -> impl Future<Output = Result<u64, ApiError>> + Send;
}
