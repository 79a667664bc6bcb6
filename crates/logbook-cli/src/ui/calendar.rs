//! Calendar pane: month grid with event days highlighted.

use chrono::Datelike;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use super::border;
use crate::{
  app::App,
  calendar::{DayCell, GridGeometry},
};

const CELL_W: u16 = 4;
/// Seven cells plus borders.
pub const WIDTH: u16 = CELL_W * 7 + 2;
/// Weekday header, up to six weeks, plus borders.
pub const HEIGHT: u16 = 1 + 6 + 2;

/// Render the calendar into `area` and report where the day grid sits.
pub fn draw(f: &mut Frame, area: Rect, app: &App, focused: bool) -> Option<GridGeometry> {
  let cal = &app.calendar;
  let arrow = |enabled: bool, glyph: &'static str| {
    let color = if enabled { Color::White } else { Color::DarkGray };
    Span::styled(glyph, Style::default().fg(color))
  };
  let title = Line::from(vec![
    Span::raw(" "),
    arrow(cal.can_prev(), "‹"),
    Span::styled(
      format!(" {} ", cal.title()),
      Style::default().add_modifier(Modifier::BOLD),
    ),
    arrow(cal.can_next(), "›"),
    Span::raw(" "),
  ]);

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(border(focused));
  let inner = block.inner(area);
  f.render_widget(block, area);
  if inner.height < 2 || inner.width < CELL_W * 7 {
    return None;
  }

  let weeks = cal.weeks(&app.event_dates);
  let mut lines = vec![Line::from(
    ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
      .iter()
      .map(|d| Span::styled(format!(" {d} "), Style::default().fg(Color::Gray)))
      .collect::<Vec<_>>(),
  )];
  lines.extend(weeks.iter().map(|week| {
    Line::from(
      week
        .iter()
        .map(|cell| match cell {
          Some(cell) => Span::styled(format!(" {:>2} ", cell.date.day()), day_style(cell, app)),
          None => Span::raw(" ".repeat(CELL_W as usize)),
        })
        .collect::<Vec<_>>(),
    )
  }));
  f.render_widget(Paragraph::new(lines), inner);

  Some(GridGeometry {
    x:      inner.x,
    y:      inner.y + 1,
    cell_w: CELL_W,
    weeks:  (weeks.len() as u16).min(inner.height - 1),
  })
}

fn day_style(cell: &DayCell, app: &App) -> Style {
  let mut style = Style::default();
  if cell.highlighted {
    style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
  }
  if cell.date == app.today {
    style = style.add_modifier(Modifier::UNDERLINED);
  }
  if cell.selected {
    style = style.bg(Color::Blue).fg(Color::White);
  }
  style
}
