//! `logbook request`: send one raw request and print what came back.

use std::io::Write;

use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;

use crate::client::{ApiClient, RawResponse};

/// Parse `--body`; invalid JSON never leaves the machine.
pub fn parse_body(raw: Option<&str>) -> Result<Option<Value>> {
  raw
    .map(|s| serde_json::from_str(s).with_context(|| format!("--body is not valid JSON: {s}")))
    .transpose()
}

pub fn parse_method(raw: &str) -> Result<Method> {
  Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
    .with_context(|| format!("invalid HTTP method {raw:?}"))
}

/// Status line, timing, headers, then the body.
pub fn render(out: &mut impl Write, response: &RawResponse) -> std::io::Result<()> {
  writeln!(out, "{}  ({} ms)", response.status, response.elapsed.as_millis())?;
  for (name, value) in &response.headers {
    writeln!(out, "{name}: {}", value.to_str().unwrap_or("<binary>"))?;
  }
  if !response.body.is_empty() {
    writeln!(out)?;
    writeln!(out, "{}", response.pretty_body())?;
  }
  Ok(())
}

/// Send the request and print the response to `out`. Returns whether the
/// status was a success.
pub async fn run(
  client: &ApiClient,
  method: &str,
  path: &str,
  body: Option<&str>,
  out: &mut impl Write,
) -> Result<bool> {
  let method = parse_method(method)?;
  let body = parse_body(body)?;
  let response = client.raw(method, path, body.as_ref()).await?;
  render(out, &response).context("writing response")?;
  Ok(response.status.is_success())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_server;

  #[test]
  fn bodies_are_checked_locally() {
    assert_eq!(parse_body(None).unwrap(), None);
    assert_eq!(
      parse_body(Some(r#"{"name":"mood"}"#)).unwrap(),
      Some(serde_json::json!({"name": "mood"}))
    );
    assert!(parse_body(Some("{name:")).is_err());
  }

  #[test]
  fn methods_are_case_insensitive() {
    assert_eq!(parse_method("patch").unwrap(), Method::PATCH);
    assert!(parse_method("GE T").is_err());
  }

  #[tokio::test]
  async fn prints_status_headers_and_pretty_body() {
    let client = test_server::spawn().await;
    let mut out = Vec::new();
    let ok = run(
      &client,
      "post",
      "/api/series",
      Some(r#"{"name":"mood","valueType":"STRING"}"#),
      &mut out,
    )
    .await
    .unwrap();
    assert!(ok);

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("201 Created  ("), "{text}");
    assert!(text.contains("content-type: application/json"), "{text}");
    assert!(text.contains("  \"name\": \"mood\""), "{text}");
  }

  #[tokio::test]
  async fn error_statuses_are_printed_and_reported() {
    let client = test_server::spawn().await;
    let mut out = Vec::new();
    let ok = run(&client, "DELETE", "/api/series/42", None, &mut out).await.unwrap();
    assert!(!ok);
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("404 Not Found"), "{text}");
    assert!(text.contains("\"kind\": \"not_found\""), "{text}");
  }
}
