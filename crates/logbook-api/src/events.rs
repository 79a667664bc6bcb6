//! Event-specific validation layered over any events controller.
//!
//! An event must reference an existing series when it is created, and when an
//! update moves it to another series. The numeric check on `seriesId` happens
//! while the body is decoded; the existence check happens here.

use logbook_core::{
  Error,
  event::{Event, EventFilter, EventPatch, EventQuery, NewEvent},
  resource::EventResource,
  series::SeriesId,
  store::SeriesDirectory,
};

use crate::{controller::Controller, error::ApiError, extract::RequestInfo};

pub struct EventController<C, S> {
  inner:  C,
  series: S,
}

impl<C, S> EventController<C, S> {
  pub fn new(inner: C, series: S) -> Self { Self { inner, series } }
}

impl<C, S> EventController<C, S>
where
  S: SeriesDirectory,
{
  async fn require_series(&self, id: SeriesId) -> Result<(), ApiError> {
    let exists = self
      .series
      .series_exists(id)
      .await
      .map_err(|e| ApiError::from_delegate("series", "lookup", e))?;
    if !exists {
      return Err(ApiError::validation(Error::MissingSeries(id).to_string()));
    }
    Ok(())
  }
}

impl<C, S> Controller<EventResource> for EventController<C, S>
where
  C: Controller<EventResource>,
  S: SeriesDirectory + 'static,
{
  async fn list(&self, req: &RequestInfo, query: EventQuery) -> Result<Vec<Event>, ApiError> {
    self.inner.list(req, query).await
  }

  async fn create(&self, req: &RequestInfo, input: NewEvent) -> Result<Event, ApiError> {
    self.require_series(input.series_id).await?;
    self.inner.create(req, input).await
  }

  async fn update(&self, req: &RequestInfo, id: i64, patch: EventPatch) -> Result<Event, ApiError> {
    if let Some(series_id) = patch.series_id {
      self.require_series(series_id).await?;
    }
    self.inner.update(req, id, patch).await
  }

  async fn delete(&self, req: &RequestInfo, id: i64) -> Result<(), ApiError> {
    self.inner.delete(req, id).await
  }

  async fn delete_all(&self, req: &RequestInfo, filter: EventFilter) -> Result<u64, ApiError> {
    self.inner.delete_all(req, filter).await
  }
}
