//! `logbook`: terminal UI for the logbook tracking server.
//!
//! # Usage
//!
//! ```
//! logbook --url http://localhost:3001
//! logbook --config ~/.config/logbook/cli.toml
//! logbook request GET /api/events?include=series
//! logbook request POST /api/series --body '{"name":"mood","valueType":"STRING"}'
//! ```

mod app;
mod calendar;
mod client;
mod form;
mod inspect;
mod series_delete;
mod table;
#[cfg(test)]
mod test_server;
mod ui;

use std::{io, path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, DisableMouseCapture, EnableMouseCapture, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;

const DEFAULT_URL: &str = "http://localhost:3001";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "logbook", about = "Terminal UI for the logbook tracking server")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the logbook server (default: http://localhost:3001).
  #[arg(long, env = "LOGBOOK_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Send one request and print the raw response.
  Request {
    /// HTTP method, e.g. GET or PATCH.
    method: String,
    /// Path relative to the server root, e.g. /api/series.
    path:   String,
    /// JSON request body.
    #[arg(long)]
    body:   Option<String>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

fn api_config(args: &Args) -> Result<ApiConfig> {
  let file_cfg: ConfigFile = match &args.config {
    Some(path) => {
      let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
      toml::from_str(&raw).context("parsing config file")?
    }
    None => ConfigFile::default(),
  };

  // CLI flags override the config file, which overrides the default.
  Ok(ApiConfig {
    base_url: args
      .url
      .clone()
      .or_else(|| (!file_cfg.url.is_empty()).then_some(file_cfg.url))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  })
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let args = Args::parse();
  let client = ApiClient::new(api_config(&args)?)?;

  if let Some(Command::Request { method, path, body }) = &args.command {
    let ok = inspect::run(&client, method, path, body.as_deref(), &mut io::stdout()).await?;
    return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
  }

  let mut app = App::new(client);

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
    .context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore the terminal even on error.
  let run_result = match app.load().await {
    Ok(()) => run_event_loop(&mut terminal, &mut app).await,
    Err(e) => Err(e),
  };

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result.map(|()| ExitCode::SUCCESS)
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    let mut grid = None;
    terminal
      .draw(|f| grid = ui::draw(f, app))
      .context("drawing frame")?;
    app.grid = grid;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) => {
        if !app.handle_key(key).await? {
          break;
        }
      }
      Some(Event::Mouse(mouse)) => app.handle_mouse(mouse).await?,
      _ => {}
    }

    if let Err(e) = app.process_changes().await {
      app.status_msg = format!("Error: {e:#}");
    }
  }

  Ok(())
}
