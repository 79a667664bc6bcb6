//! Request extractors whose rejections render as [`ApiError`]s.

use std::convert::Infallible;

use axum::{
  body::Bytes,
  extract::{FromRequest, FromRequestParts, OriginalUri, Request},
  http::{Method, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Method and full path of the request being served, for logging.
#[derive(Debug, Clone)]
pub struct RequestInfo {
  pub method: Method,
  pub path:   String,
}

impl RequestInfo {
  pub fn new(method: Method, path: impl Into<String>) -> Self {
    Self {
      method,
      path: path.into(),
    }
  }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestInfo {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    // Nested routers see a stripped URI; prefer the one the client sent.
    let uri = parts
      .extensions
      .get::<OriginalUri>()
      .map(|o| &o.0)
      .unwrap_or(&parts.uri);
    let path = uri
      .path_and_query()
      .map(|pq| pq.as_str().to_owned())
      .unwrap_or_else(|| uri.path().to_owned());
    Ok(Self::new(parts.method.clone(), path))
  }
}

/// A JSON request body. Unlike [`axum::Json`] the content type is not
/// checked, and failures become validation errors.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let bytes = read_body(req, state).await?;
    decode(&bytes).map(Payload)
  }
}

/// A JSON body that may be absent; an empty body yields `T::default()`.
#[derive(Debug)]
pub struct OptionalPayload<T>(pub T);

impl<T, S> FromRequest<S> for OptionalPayload<T>
where
  T: DeserializeOwned + Default,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let bytes = read_body(req, state).await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(OptionalPayload(T::default()));
    }
    decode(&bytes).map(OptionalPayload)
  }
}

async fn read_body<S: Send + Sync>(req: Request, state: &S) -> Result<Bytes, ApiError> {
  Bytes::from_request(req, state)
    .await
    .map_err(|e| ApiError::validation(e.body_text()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
  serde_json::from_slice(bytes)
    .map_err(|e| ApiError::validation(format!("invalid request body: {e}")))
}

/// Parse a record id taken from the path.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
  raw
    .trim()
    .parse()
    .map_err(|_| ApiError::validation(format!("invalid id: {raw:?}")))
}
