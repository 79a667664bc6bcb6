//! Request logging as a [`Controller`] decorator.

use logbook_core::resource::Resource;

use crate::{controller::Controller, error::ApiError, extract::RequestInfo};

/// Logs every call at `info` before forwarding it unchanged.
pub struct Logged<C> {
  inner: C,
}

impl<C> Logged<C> {
  pub fn new(inner: C) -> Self { Self { inner } }
}

impl<R, C> Controller<R> for Logged<C>
where
  R: Resource,
  C: Controller<R>,
{
  async fn list(&self, req: &RequestInfo, query: R::Query) -> Result<Vec<R::Record>, ApiError> {
    tracing::info!(
      operation = "list",
      resource = R::NAME,
      method = %req.method,
      path = %req.path,
      ?query,
      "handling request"
    );
    self.inner.list(req, query).await
  }

  async fn create(&self, req: &RequestInfo, input: R::Create) -> Result<R::Record, ApiError> {
    tracing::info!(
      operation = "create",
      resource = R::NAME,
      method = %req.method,
      path = %req.path,
      body = ?input,
      "handling request"
    );
    self.inner.create(req, input).await
  }

  async fn update(
    &self,
    req: &RequestInfo,
    id: i64,
    patch: R::Patch,
  ) -> Result<R::Record, ApiError> {
    tracing::info!(
      operation = "update",
      resource = R::NAME,
      method = %req.method,
      path = %req.path,
      id,
      body = ?patch,
      "handling request"
    );
    self.inner.update(req, id, patch).await
  }

  async fn delete(&self, req: &RequestInfo, id: i64) -> Result<(), ApiError> {
    tracing::info!(
      operation = "delete",
      resource = R::NAME,
      method = %req.method,
      path = %req.path,
      id,
      "handling request"
    );
    self.inner.delete(req, id).await
  }

  async fn delete_all(&self, req: &RequestInfo, filter: R::Filter) -> Result<u64, ApiError> {
    tracing::info!(
      operation = "delete_all",
      resource = R::NAME,
      method = %req.method,
      path = %req.path,
      body = ?filter,
      "handling request"
    );
    self.inner.delete_all(req, filter).await
  }
}
