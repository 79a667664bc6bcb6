//! Series delete dialog.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered;
use crate::series_delete::{DeleteDialog, DialogOption};

pub fn draw(f: &mut Frame, area: Rect, dialog: &DeleteDialog) {
  let options = dialog.options();
  let popup = centered(area, 56, options.len() as u16 + 5);

  let mut lines = vec![
    Line::from(format!(
      "\"{}\" has {} event(s).",
      dialog.series.name, dialog.event_count
    )),
    Line::default(),
  ];
  lines.extend(options.iter().enumerate().map(|(i, option)| {
    let selected = i == dialog.cursor;
    let style = if selected {
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default()
    };
    let mut text = format!("{} {}", if selected { ">" } else { " " }, option.label());
    if *option == DialogOption::Reassign {
      let target = dialog.target_series().map(|s| s.name.as_str()).unwrap_or("?");
      text.push_str(&format!(" ‹ {target} ›"));
    }
    Line::from(Span::styled(text, style))
  }));

  let block = Block::default()
    .title(format!(" Delete series {:?} ", dialog.series.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  f.render_widget(Clear, popup);
  f.render_widget(Paragraph::new(lines).block(block), popup);
}
