//! Add/edit form popup.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered;
use crate::{form::Form, table::ColumnKind};

const LABEL_W: usize = 10;

pub fn draw(f: &mut Frame, area: Rect, form: &Form) {
  let height = form.fields.len() as u16 + 4 + u16::from(form.error.is_some()) * 2;
  let popup = centered(area, 60, height);

  let mut lines: Vec<Line> = form
    .fields
    .iter()
    .enumerate()
    .map(|(i, field)| {
      let focused = i == form.focus;
      let value = match field.kind {
        ColumnKind::Choice => format!("‹ {} ›", field.display()),
        _ if focused => format!("{}_", field.value),
        _ => field.value.clone(),
      };
      let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::Gray)
      };
      Line::from(vec![
        Span::styled(format!("{:>width$}: ", field.label, width = LABEL_W), label_style),
        Span::raw(value),
      ])
    })
    .collect();

  if let Some(err) = &form.error {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
      err.clone(),
      Style::default().fg(Color::Red),
    )));
  }

  let block = Block::default()
    .title(format!(" {} ", form.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  f.render_widget(Clear, popup);
  f.render_widget(
    Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: false }),
    popup,
  );
}
