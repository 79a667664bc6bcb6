//! Logbook HTTP server: configuration and the fully-layered application
//! router. The binary in `main.rs` only parses flags, loads the config and
//! serves.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use axum::{
  Router,
  http::{HeaderValue, Method, header},
};
use logbook_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `LOGBOOK_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// The single browser origin allowed by CORS.
  pub cors_origin:  String,
  pub log_requests: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:         "127.0.0.1".to_string(),
      port:         3001,
      store_path:   PathBuf::from("logbook.db"),
      cors_origin:  "http://localhost:3000".to_string(),
      log_requests: true,
    }
  }
}

impl ServerConfig {
  /// Load from an optional TOML file, `LOGBOOK_*` variables and `PORT`, in
  /// increasing order of precedence.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    Self::from_sources(
      file,
      config::Environment::with_prefix("LOGBOOK"),
      std::env::var("PORT").ok(),
    )
  }

  fn from_sources(
    file: &Path,
    env: config::Environment,
    port: Option<String>,
  ) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(env)
      .set_override_option("port", port)
      .context("invalid PORT override")?
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  match (s.strip_prefix("~/"), std::env::var("HOME")) {
    (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with HTTP tracing and CORS applied.
pub fn app(store: &SqliteStore, config: &ServerConfig) -> anyhow::Result<Router> {
  let origin: HeaderValue = config
    .cors_origin
    .parse()
    .with_context(|| format!("invalid cors_origin {:?}", config.cors_origin))?;

  let cors = CorsLayer::new()
    .allow_origin(origin)
    .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
    .allow_headers([header::CONTENT_TYPE]);

  let api = logbook_api::api_router(store.series(), store.events(), config.log_requests);

  Ok(
    Router::new()
      .nest("/api", api)
      .layer(TraceLayer::new_for_http())
      .layer(cors),
  )
}
