//! Application state machine and event dispatcher.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use logbook_core::{
  event::EventQuery,
  resource::{EventResource, SeriesResource},
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
  calendar::{Calendar, GridGeometry},
  client::ApiClient,
  form::{Form, FormAction},
  series_delete::{DeleteDialog, DeletePolicy, DialogAction, delete_series},
  table::{Change, CrudTable, DeleteOutcome, SubmitOutcome, series_choices, value_type_choices},
};

// ─── Focus / modal ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Calendar,
  Series,
  Events,
}

impl Focus {
  fn next(self) -> Self {
    match self {
      Self::Calendar => Self::Series,
      Self::Series => Self::Events,
      Self::Events => Self::Calendar,
    }
  }

  fn prev(self) -> Self { self.next().next() }
}

/// A popup that takes all keyboard input while open.
#[derive(Debug, Clone)]
pub enum Modal {
  None,
  SeriesForm(Form),
  EventForm(Form),
  DeleteSeries(DeleteDialog),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub focus:       Focus,
  pub modal:       Modal,
  pub calendar:    Calendar,
  pub series:      CrudTable<SeriesResource>,
  pub events:      CrudTable<EventResource>,
  /// Every date with at least one event, sorted; drives the highlights.
  pub event_dates: Vec<NaiveDate>,
  /// One-line status message shown in the status bar.
  pub status_msg:  String,
  /// Where the calendar grid was last drawn.
  pub grid:        Option<GridGeometry>,
  pub today:       NaiveDate,
  client:          ApiClient,
  changes:         UnboundedReceiver<Change>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    let today = Local::now().date_naive();
    let (tx, rx) = mpsc::unbounded_channel();
    let mut series = CrudTable::new(client.series(), tx.clone());
    series.set_choices("valueType", value_type_choices());
    let mut events = CrudTable::new(client.events(), tx);
    events.query = EventQuery::with_series();

    Self {
      focus: Focus::Calendar,
      modal: Modal::None,
      calendar: calendar_for(today),
      series,
      events,
      event_dates: Vec::new(),
      status_msg: String::new(),
      grid: None,
      today,
      client,
      changes: rx,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch everything the page shows.
  pub async fn load(&mut self) -> Result<()> {
    self.status_msg = "Loading…".into();
    self.reload_series().await?;
    self.events.reload().await?;
    self.reload_dates().await?;
    self.status_msg.clear();
    Ok(())
  }

  async fn reload_series(&mut self) -> Result<()> {
    self.series.reload().await?;
    self
      .events
      .set_choices("seriesId", series_choices(&self.series.rows));
    Ok(())
  }

  async fn reload_dates(&mut self) -> Result<()> {
    let all = self.client.events().list(&EventQuery::default()).await?;
    let mut dates: Vec<_> = all.into_iter().map(|e| e.date).collect();
    dates.sort_unstable();
    dates.dedup();
    self.event_dates = dates;
    Ok(())
  }

  /// Drain pending [`Change`]s and refresh whatever depends on them.
  pub async fn process_changes(&mut self) -> Result<()> {
    let mut series = false;
    let mut events = false;
    while let Ok(change) = self.changes.try_recv() {
      match change {
        Change::Series => series = true,
        Change::Events => events = true,
      }
    }
    // Events embed their series, and series deletes may move or remove
    // events, so a series change refreshes both.
    if series {
      self
        .events
        .set_choices("seriesId", series_choices(&self.series.rows));
      self.events.reload().await?;
    }
    if series || events {
      self.reload_dates().await?;
    }
    Ok(())
  }

  /// The most recent event on or before today and how long ago it was.
  pub fn last_event(&self) -> Option<(NaiveDate, i64)> {
    last_event_summary(&self.event_dates, self.today)
  }

  // ── Day view ──────────────────────────────────────────────────────────────

  /// Filter the events table to `date`, or show every event for `None`.
  pub async fn select_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
    self.calendar.selected = date;
    self.events.query.from = date;
    self.events.query.to = date;
    self.events.cursor = 0;
    self.events.reload().await
  }

  // ── Input ─────────────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    let outcome = match self.modal {
      Modal::None => self.handle_page_key(key).await,
      _ => self.handle_modal_key(key).await.map(|()| true),
    };
    match outcome {
      Ok(cont) => Ok(cont),
      Err(e) => {
        self.status_msg = format!("Error: {e:#}");
        Ok(true)
      }
    }
  }

  async fn handle_page_key(&mut self, key: KeyEvent) -> Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Tab => self.focus = self.focus.next(),
      KeyCode::BackTab => self.focus = self.focus.prev(),
      _ => match self.focus {
        Focus::Calendar => self.handle_calendar_key(key).await?,
        Focus::Series => self.handle_series_key(key).await?,
        Focus::Events => self.handle_events_key(key).await?,
      },
    }
    Ok(true)
  }

  async fn handle_calendar_key(&mut self, key: KeyEvent) -> Result<()> {
    match key.code {
      KeyCode::Left | KeyCode::Char('h') => self.calendar.move_selection(-1),
      KeyCode::Right | KeyCode::Char('l') => self.calendar.move_selection(1),
      KeyCode::Up | KeyCode::Char('k') => self.calendar.move_selection(-7),
      KeyCode::Down | KeyCode::Char('j') => self.calendar.move_selection(7),
      KeyCode::Char('[') => {
        self.calendar.prev_month();
      }
      KeyCode::Char(']') => {
        self.calendar.next_month();
      }
      KeyCode::Char('t') => {
        self.calendar = calendar_for(self.today);
        self.select_date(Some(self.today)).await?;
      }
      KeyCode::Enter => self.select_date(self.calendar.selected).await?,
      KeyCode::Esc => self.select_date(None).await?,
      _ => {}
    }
    Ok(())
  }

  async fn handle_series_key(&mut self, key: KeyEvent) -> Result<()> {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => self.series.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => self.series.move_cursor(-1),
      KeyCode::Char('a') => self.modal = Modal::SeriesForm(self.series.add_form()),
      KeyCode::Char('e') | KeyCode::Enter => {
        if let Some(form) = self.series.edit_form() {
          self.modal = Modal::SeriesForm(form);
        }
      }
      KeyCode::Char('d') => {
        if let DeleteOutcome::Deferred(id) = self.series.delete_selected().await? {
          self.open_delete_dialog(id).await?;
        }
      }
      KeyCode::Char('r') => self.reload_series().await?,
      _ => {}
    }
    Ok(())
  }

  async fn handle_events_key(&mut self, key: KeyEvent) -> Result<()> {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => self.events.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => self.events.move_cursor(-1),
      KeyCode::Char('a') => {
        let mut form = self.events.add_form();
        // New events land on the day being viewed.
        if let Some(date) = self.events.query.from {
          form.set_value("date", logbook_core::day::format(date));
        }
        self.modal = Modal::EventForm(form);
      }
      KeyCode::Char('e') | KeyCode::Enter => {
        if let Some(form) = self.events.edit_form() {
          self.modal = Modal::EventForm(form);
        }
      }
      KeyCode::Char('d') => {
        if self.events.delete_selected().await? == DeleteOutcome::Deleted {
          self.status_msg = "Event deleted".into();
        }
      }
      KeyCode::Char('r') => self.events.reload().await?,
      _ => {}
    }
    Ok(())
  }

  async fn handle_modal_key(&mut self, key: KeyEvent) -> Result<()> {
    match std::mem::replace(&mut self.modal, Modal::None) {
      Modal::None => {}
      Modal::SeriesForm(mut form) => match form.handle_key(key) {
        FormAction::None => self.modal = Modal::SeriesForm(form),
        FormAction::Cancel => {}
        FormAction::Submit => {
          if self.series.submit(&mut form, &[]).await? == SubmitOutcome::Rejected {
            self.modal = Modal::SeriesForm(form);
          }
        }
      },
      Modal::EventForm(mut form) => match form.handle_key(key) {
        FormAction::None => self.modal = Modal::EventForm(form),
        FormAction::Cancel => {}
        FormAction::Submit => {
          if self.events.submit(&mut form, &self.series.rows).await? == SubmitOutcome::Rejected {
            self.modal = Modal::EventForm(form);
          }
        }
      },
      Modal::DeleteSeries(mut dialog) => match dialog.handle_key(key) {
        DialogAction::None => self.modal = Modal::DeleteSeries(dialog),
        DialogAction::Cancel => {}
        DialogAction::Confirm(policy) => self.confirm_delete(&dialog, policy).await?,
      },
    }
    Ok(())
  }

  async fn open_delete_dialog(&mut self, id: i64) -> Result<()> {
    let Some(series) = self.series.rows.iter().find(|s| s.id == id).cloned() else {
      return Ok(());
    };
    let owned = self
      .client
      .events()
      .list(&EventQuery {
        series_id: Some(id),
        ..Default::default()
      })
      .await?;
    self.modal = Modal::DeleteSeries(DeleteDialog::new(series, &self.series.rows, owned.len()));
    Ok(())
  }

  async fn confirm_delete(&mut self, dialog: &DeleteDialog, policy: DeletePolicy) -> Result<()> {
    let name = &dialog.series.name;
    let affected = delete_series(&self.client, dialog.series.id, policy).await?;
    self.status_msg = match policy {
      DeletePolicy::Orphan => format!("Deleted series {name:?}; its events were kept"),
      DeletePolicy::Cascade => format!("Deleted series {name:?} and {affected} event(s)"),
      DeletePolicy::Reassign(_) => format!(
        "Deleted series {name:?}; moved {affected} event(s) to {:?}",
        dialog.target_series().map(|s| s.name.as_str()).unwrap_or_default()
      ),
    };
    self.series.mutated().await?;
    self.process_changes().await
  }

  /// Left clicks on a calendar day select it and switch to its day view.
  pub async fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
    if !matches!(self.modal, Modal::None) {
      return Ok(());
    }
    let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
      return Ok(());
    };
    let Some((week, weekday)) = self.grid.and_then(|g| g.hit(mouse.column, mouse.row)) else {
      return Ok(());
    };
    if let Some(date) = self.calendar.click(week, weekday) {
      self.focus = Focus::Calendar;
      if let Err(e) = self.select_date(Some(date)).await {
        self.status_msg = format!("Error: {e:#}");
      }
    }
    Ok(())
  }
}

/// The calendar opens on the current month and stops there; nothing is
/// logged ahead of time.
fn calendar_for(today: NaiveDate) -> Calendar { Calendar::new(today).with_bounds(None, Some(today)) }

/// The latest of `dates` not after `today`, with the number of days since.
pub fn last_event_summary(dates: &[NaiveDate], today: NaiveDate) -> Option<(NaiveDate, i64)> {
  let last = dates.iter().copied().filter(|d| *d <= today).max()?;
  Some((last, (today - last).num_days()))
}
