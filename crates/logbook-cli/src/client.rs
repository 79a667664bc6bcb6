//! Async HTTP client wrapping the logbook JSON API.

use std::{
  marker::PhantomData,
  time::{Duration, Instant},
};

use anyhow::{Context, Result, anyhow};
use logbook_core::{
  ErrorBody,
  resource::{EventResource, Resource, SeriesResource},
};
use reqwest::{Client, Method, Response, StatusCode, header::HeaderMap};

/// Connection settings for the logbook API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the logbook JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let mut builder = Client::builder().timeout(Duration::from_secs(30));
    // A proxy in the environment must not intercept a local server.
    if is_loopback(&config.base_url) {
      builder = builder.no_proxy();
    }
    let client = builder.build().context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { self.config.base_url.trim_end_matches('/') }

  fn url(&self, path: &str) -> String { format!("{}/api{}", self.base_url(), path) }

  /// Typed CRUD access to one resource.
  pub fn resource<R: Resource>(&self) -> CrudApi<R> {
    CrudApi {
      client:    self.clone(),
      _resource: PhantomData,
    }
  }

  pub fn series(&self) -> CrudApi<SeriesResource> { self.resource() }

  pub fn events(&self) -> CrudApi<EventResource> { self.resource() }

  /// Send one request to `path` (relative to the server root) and return
  /// the response as-is, whatever its status.
  pub async fn raw(
    &self,
    method: Method,
    path: &str,
    body: Option<&serde_json::Value>,
  ) -> Result<RawResponse> {
    let url = format!("{}/{}", self.base_url(), path.trim_start_matches('/'));
    let mut req = self.client.request(method.clone(), &url);
    if let Some(body) = body {
      req = req.json(body);
    }

    let started = Instant::now();
    let resp = req
      .send()
      .await
      .with_context(|| format!("{method} {url} failed"))?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.text().await.context("reading response body")?;

    Ok(RawResponse {
      status,
      elapsed: started.elapsed(),
      headers,
      body,
    })
  }
}

fn is_loopback(base_url: &str) -> bool {
  reqwest::Url::parse(base_url)
    .ok()
    .and_then(|u| u.host_str().map(str::to_owned))
    .is_some_and(|h| matches!(h.as_str(), "localhost" | "127.0.0.1" | "[::1]"))
}

/// Turn a non-2xx response into an error carrying the status and the
/// server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let text = resp.text().await.unwrap_or_default();
  let message = serde_json::from_str::<ErrorBody>(&text)
    .map(|b| b.message)
    .unwrap_or(text);
  Err(anyhow!("{what} → {status}: {message}"))
}

// ─── Typed CRUD ───────────────────────────────────────────────────────────────

/// The five CRUD operations for one resource, mirroring the server routes.
pub struct CrudApi<R> {
  client:    ApiClient,
  _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for CrudApi<R> {
  fn clone(&self) -> Self {
    Self {
      client:    self.client.clone(),
      _resource: PhantomData,
    }
  }
}

impl<R: Resource> CrudApi<R> {
  fn collection(&self) -> String { self.client.url(&format!("/{}", R::NAME)) }

  fn item(&self, id: i64) -> String { self.client.url(&format!("/{}/{id}", R::NAME)) }

  /// `GET /api/<name>`
  pub async fn list(&self, query: &R::Query) -> Result<Vec<R::Record>> {
    let what = format!("GET /{}", R::NAME);
    let resp = self
      .client
      .client
      .get(self.collection())
      .query(query)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    check(resp, &what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {}", R::NAME))
  }

  /// `POST /api/<name>`
  pub async fn create(&self, input: &R::Create) -> Result<R::Record> {
    let what = format!("POST /{}", R::NAME);
    let resp = self
      .client
      .client
      .post(self.collection())
      .json(input)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    check(resp, &what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising created {}", R::NAME))
  }

  /// `PATCH /api/<name>/:id`
  pub async fn update(&self, id: i64, patch: &R::Patch) -> Result<R::Record> {
    let what = format!("PATCH /{}/{id}", R::NAME);
    let resp = self
      .client
      .client
      .patch(self.item(id))
      .json(patch)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    check(resp, &what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising updated {}", R::NAME))
  }

  /// `DELETE /api/<name>/:id`
  pub async fn delete(&self, id: i64) -> Result<()> {
    let what = format!("DELETE /{}/{id}", R::NAME);
    let resp = self
      .client
      .client
      .delete(self.item(id))
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    check(resp, &what).await?;
    Ok(())
  }

  /// `DELETE /api/<name>` with `filter` as the body.
  pub async fn delete_all(&self, filter: &R::Filter) -> Result<()> {
    let what = format!("DELETE /{}", R::NAME);
    let resp = self
      .client
      .client
      .delete(self.collection())
      .json(filter)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    check(resp, &what).await?;
    Ok(())
  }
}

// ─── Raw responses ────────────────────────────────────────────────────────────

/// A response captured by [`ApiClient::raw`].
#[derive(Debug)]
pub struct RawResponse {
  pub status:  StatusCode,
  pub elapsed: Duration,
  pub headers: HeaderMap,
  pub body:    String,
}

impl RawResponse {
  /// The body pretty-printed if it is JSON, verbatim otherwise.
  pub fn pretty_body(&self) -> String {
    serde_json::from_str::<serde_json::Value>(&self.body)
      .ok()
      .and_then(|v| serde_json::to_string_pretty(&v).ok())
      .unwrap_or_else(|| self.body.clone())
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use logbook_core::{
    event::{EventFilter, EventPatch, EventQuery, NewEvent},
    series::{NewSeries, SeriesPatch, SeriesQuery},
    value::ValueType,
  };
  use serde_json::json;

  use super::*;
  use crate::test_server;

  #[test]
  fn loopback_detection() {
    assert!(is_loopback("http://localhost:3001"));
    assert!(is_loopback("http://127.0.0.1:9/"));
    assert!(!is_loopback("https://logbook.example.com"));
    assert!(!is_loopback("not a url"));
  }

  #[tokio::test]
  async fn series_round_trip() {
    let client = test_server::spawn().await;
    let api = client.series();

    let input = NewSeries {
      name:              "mood".into(),
      value_type:        ValueType::Selection,
      selection_options: vec!["good".into(), "bad".into()],
    };
    let created = api.create(&input).await.unwrap();
    assert_eq!(created.name, input.name);
    assert_eq!(created.value_type, input.value_type);
    assert_eq!(created.selection_options, input.selection_options);

    let listed = api.list(&SeriesQuery::default()).await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let updated = api
      .update(created.id, &SeriesPatch {
        name: Some("feeling".into()),
        ..Default::default()
      })
      .await
      .unwrap();
    assert_eq!(updated.name, "feeling");
    assert_eq!(updated.selection_options, created.selection_options);

    api.delete(created.id).await.unwrap();
    assert!(api.list(&SeriesQuery::default()).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn event_round_trip_normalises_dates() {
    let client = test_server::spawn().await;
    let series = client
      .series()
      .create(&NewSeries::new("steps", ValueType::Number))
      .await
      .unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 4, 3).unwrap();
    let input = NewEvent {
      series_id: series.id,
      value:     json!(4200),
      date,
      notes:     "long walk".into(),
    };
    let created = client.events().create(&input).await.unwrap();
    assert_eq!(
      (created.series_id, &created.value, created.date, &created.notes),
      (input.series_id, &input.value, input.date, &input.notes)
    );

    let listed = client
      .events()
      .list(&EventQuery {
        series_id: Some(series.id),
        ..EventQuery::with_series()
      })
      .await
      .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].series.as_ref(), Some(&series));

    let moved = client
      .events()
      .update(created.id, &EventPatch {
        date: Some(date.succ_opt().unwrap()),
        ..Default::default()
      })
      .await
      .unwrap();
    assert_eq!(moved.date, NaiveDate::from_ymd_opt(2025, 4, 4).unwrap());

    client
      .events()
      .delete_all(&EventFilter::for_series(series.id))
      .await
      .unwrap();
    assert!(client.events().list(&EventQuery::default()).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn server_errors_carry_status_and_message() {
    let client = test_server::spawn().await;
    let err = client
      .events()
      .create(&NewEvent {
        series_id: 12,
        value:     json!(1),
        date:      NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        notes:     String::new(),
      })
      .await
      .unwrap_err();
    let text = err.to_string();
    assert!(text.contains("400"), "{text}");
    assert!(text.contains("target series 12 does not exist"), "{text}");

    let err = client.series().delete(5).await.unwrap_err();
    assert!(err.to_string().contains("404"));
  }

  #[tokio::test]
  async fn raw_requests_return_any_status() {
    let client = test_server::spawn().await;

    let resp = client
      .raw(Method::POST, "/api/series", Some(&json!({ "name": "x" })))
      .await
      .unwrap();
    assert_eq!(resp.status, StatusCode::CREATED);
    assert!(resp.pretty_body().contains("\"name\": \"x\""));

    let resp = client.raw(Method::PATCH, "api/series/99", Some(&json!({}))).await.unwrap();
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.body.contains("not_found"));
  }
}
