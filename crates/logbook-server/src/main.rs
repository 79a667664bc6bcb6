//! logbook-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), applies
//! `LOGBOOK_*` and `PORT` environment overrides, opens the SQLite store and
//! serves the JSON API under `/api`.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use logbook_server::ServerConfig;
use logbook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Logbook API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config = ServerConfig::load(&cli.config)?;

  let store = SqliteStore::open(&config.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", config.store_path))?;

  let app = logbook_server::app(&store, &config)?;
  let address = config.address();

  tracing::info!(
    store = %config.store_path.display(),
    cors_origin = %config.cors_origin,
    log_requests = config.log_requests,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
