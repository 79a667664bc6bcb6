//! Table pane for any [`TableResource`].

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Span,
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::border;
use crate::table::{CrudTable, TableResource};

pub fn draw<T: TableResource>(
  f: &mut Frame,
  area: Rect,
  table: &CrudTable<T>,
  title: String,
  focused: bool,
) {
  let block = Block::default()
    .title(format!(" {title} ({}) ", table.rows.len()))
    .borders(Borders::ALL)
    .border_style(border(focused));

  if table.rows.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(Span::styled(
        "Nothing here yet. Press a to add.",
        Style::default().fg(Color::DarkGray),
      )),
      inner,
    );
    return;
  }

  let columns = T::columns();
  let header = Row::new(columns.iter().map(|c| Cell::from(c.header))).style(
    Style::default()
      .fg(Color::Gray)
      .add_modifier(Modifier::BOLD),
  );
  let rows = table
    .rows
    .iter()
    .map(|record| Row::new(columns.iter().map(|c| Cell::from(T::cell(record, c.key)))));
  let widths = columns.iter().map(|c| Constraint::Length(c.width));

  let mut state = TableState::default();
  state.select(Some(table.cursor));

  let highlight = if focused {
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().add_modifier(Modifier::REVERSED)
  };

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .block(block)
      .column_spacing(1)
      .row_highlight_style(highlight),
    area,
    &mut state,
  );
}
