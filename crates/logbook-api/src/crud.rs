//! The generic CRUD controller.

use std::marker::PhantomData;

use logbook_core::{resource::Resource, store::Delegate};

use crate::{controller::Controller, error::ApiError, extract::RequestInfo};

/// Forwards every operation to a [`Delegate`] and converts its failures into
/// [`ApiError`]s. Nothing here is specific to one resource.
pub struct Crud<R, D> {
  delegate:  D,
  _resource: PhantomData<fn() -> R>,
}

impl<R, D> Crud<R, D> {
  pub fn new(delegate: D) -> Self {
    Self {
      delegate,
      _resource: PhantomData,
    }
  }
}

fn fail<R: Resource, E>(operation: &'static str) -> impl FnOnce(E) -> ApiError
where
  E: std::error::Error + logbook_core::Classify,
{
  move |e| ApiError::from_delegate(R::NAME, operation, e)
}

impl<R, D> Controller<R> for Crud<R, D>
where
  R: Resource,
  D: Delegate<R> + 'static,
{
  async fn list(&self, _req: &RequestInfo, query: R::Query) -> Result<Vec<R::Record>, ApiError> {
    self.delegate.list(query).await.map_err(fail::<R, _>("list"))
  }

  async fn create(&self, _req: &RequestInfo, input: R::Create) -> Result<R::Record, ApiError> {
    let record = self.delegate.create(input).await.map_err(fail::<R, _>("create"))?;
    tracing::debug!(resource = R::NAME, id = R::id(&record), "created");
    Ok(record)
  }

  async fn update(
    &self,
    _req: &RequestInfo,
    id: i64,
    patch: R::Patch,
  ) -> Result<R::Record, ApiError> {
    self
      .delegate
      .update(id, patch)
      .await
      .map_err(fail::<R, _>("update"))
  }

  async fn delete(&self, _req: &RequestInfo, id: i64) -> Result<(), ApiError> {
    self.delegate.delete(id).await.map_err(fail::<R, _>("delete"))
  }

  async fn delete_all(&self, _req: &RequestInfo, filter: R::Filter) -> Result<u64, ApiError> {
    let removed = self
      .delegate
      .delete_all(filter)
      .await
      .map_err(fail::<R, _>("delete_all"))?;
    tracing::debug!(resource = R::NAME, removed, "deleted");
    Ok(removed)
  }
}
