//! Axum handlers generic over a [`Controller`], and the per-resource router.
//!
//! | Method   | Path              | Response |
//! |----------|-------------------|----------|
//! | `GET`    | `/<name>`         | 200 + list; query forwarded as `R::Query` |
//! | `POST`   | `/<name>`         | 201 + created record |
//! | `PATCH`  | `/<name>/{id}`    | 200 + updated record |
//! | `DELETE` | `/<name>/{id}`    | 204 |
//! | `DELETE` | `/<name>`         | 204; optional `R::Filter` body |

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::{Path, Query, State, rejection::QueryRejection},
  http::StatusCode,
  response::IntoResponse,
  routing::{get, patch},
};
use logbook_core::resource::Resource;

use crate::{
  controller::Controller,
  error::ApiError,
  extract::{OptionalPayload, Payload, RequestInfo, parse_id},
};

/// Mount the five CRUD routes for `R` at `/<R::NAME>`.
pub fn resource_router<R, C>(controller: C) -> Router<()>
where
  R: Resource,
  C: Controller<R>,
{
  let collection = format!("/{}", R::NAME);
  let item = format!("/{}/{{id}}", R::NAME);

  Router::new()
    .route(
      &collection,
      get(list::<R, C>)
        .post(create::<R, C>)
        .delete(delete_all::<R, C>),
    )
    .route(&item, patch(update::<R, C>).delete(delete_one::<R, C>))
    .with_state(Arc::new(controller))
}

async fn list<R, C>(
  State(controller): State<Arc<C>>,
  req: RequestInfo,
  query: Result<Query<R::Query>, QueryRejection>,
) -> Result<Json<Vec<R::Record>>, ApiError>
where
  R: Resource,
  C: Controller<R>,
{
  let Query(query) = query.map_err(|e| ApiError::validation(e.body_text()))?;
  let records = controller.list(&req, query).await?;
  Ok(Json(records))
}

async fn create<R, C>(
  State(controller): State<Arc<C>>,
  req: RequestInfo,
  Payload(input): Payload<R::Create>,
) -> Result<impl IntoResponse, ApiError>
where
  R: Resource,
  C: Controller<R>,
{
  let record = controller.create(&req, input).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

async fn update<R, C>(
  State(controller): State<Arc<C>>,
  req: RequestInfo,
  Path(id): Path<String>,
  Payload(patch): Payload<R::Patch>,
) -> Result<Json<R::Record>, ApiError>
where
  R: Resource,
  C: Controller<R>,
{
  let id = parse_id(&id)?;
  let record = controller.update(&req, id, patch).await?;
  Ok(Json(record))
}

async fn delete_one<R, C>(
  State(controller): State<Arc<C>>,
  req: RequestInfo,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  R: Resource,
  C: Controller<R>,
{
  let id = parse_id(&id)?;
  controller.delete(&req, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

async fn delete_all<R, C>(
  State(controller): State<Arc<C>>,
  req: RequestInfo,
  OptionalPayload(filter): OptionalPayload<R::Filter>,
) -> Result<StatusCode, ApiError>
where
  R: Resource,
  C: Controller<R>,
{
  controller.delete_all(&req, filter).await?;
  Ok(StatusCode::NO_CONTENT)
}
