//! TUI rendering. Orchestrates all panes.

pub mod calendar;
pub mod dialog;
pub mod form;
pub mod table;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::{
  app::{App, Focus, Modal},
  calendar::GridGeometry,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame. Returns where the calendar grid
/// landed so mouse clicks can be mapped back to dates.
pub fn draw(f: &mut Frame, app: &App) -> Option<GridGeometry> {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  let grid = draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  match &app.modal {
    Modal::None => {}
    Modal::SeriesForm(form) | Modal::EventForm(form) => form::draw(f, area, form),
    Modal::DeleteSeries(dialog) => dialog::draw(f, area, dialog),
  }

  grid
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let left = Span::styled(
    " logbook  [Tab] focus  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let last = match app.last_event() {
    Some((date, 0)) => format!("last event {date} (today)"),
    Some((date, 1)) => format!("last event {date} (yesterday)"),
    Some((date, days)) => format!("last event {date} ({days} days ago)"),
    None => "no events yet".to_string(),
  };
  let right = Span::styled(
    format!("{last}  {} ", app.today.format("%Y-%m-%d")),
    Style::default().fg(Color::Gray),
  );

  let pad = area
    .width
    .saturating_sub(left.content.chars().count() as u16)
    .saturating_sub(right.content.chars().count() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) -> Option<GridGeometry> {
  // Left: calendar over series. Right: events.
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Length(calendar::WIDTH), Constraint::Min(0)])
    .split(area);
  let left = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(calendar::HEIGHT), Constraint::Min(0)])
    .split(cols[0]);

  let grid = calendar::draw(f, left[0], app, app.focus == Focus::Calendar);
  table::draw(f, left[1], &app.series, "Series".into(), app.focus == Focus::Series);

  let events_title = match app.events.query.from {
    Some(day) => format!("Events on {day}"),
    None => "Events".into(),
  };
  table::draw(f, cols[1], &app.events, events_title, app.focus == Focus::Events);

  grid
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match (&app.modal, app.focus) {
    (Modal::SeriesForm(_) | Modal::EventForm(_), _) => {
      ("FORM", "Tab/↑↓ field  ←→ choice  Enter save  Esc cancel")
    }
    (Modal::DeleteSeries(_), _) => ("DELETE", "↑↓ option  ←→ target  Enter confirm  Esc cancel"),
    (Modal::None, Focus::Calendar) => (
      "CALENDAR",
      "arrows move  Enter view day  Esc all days  [ ] month  t today  click a day",
    ),
    (Modal::None, Focus::Series | Focus::Events) => {
      ("TABLE", "↑↓/jk move  a add  e edit  d delete  r reload")
    }
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::Gray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// A `width` × `height` rectangle centred in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

/// Border colour for a pane with or without focus.
fn border(focused: bool) -> Style {
  if focused {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn centered_rects_fit() {
    let area = Rect::new(0, 0, 80, 24);
    assert_eq!(centered(area, 40, 10), Rect::new(20, 7, 40, 10));
    assert_eq!(centered(area, 100, 30), area);
  }
}
