//! Deleting a series, and what happens to its events.
//!
//! The server never touches events when a series is deleted. The policy is
//! chosen by the user each time and carried out here, client-side.

use anyhow::{Result, bail};
use crossterm::event::{KeyCode, KeyEvent};
use logbook_core::{
  event::{EventFilter, EventPatch, EventQuery},
  series::{Series, SeriesId},
};

use crate::client::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
  /// Delete only the series; its events keep the dangling reference.
  Orphan,
  /// Delete the series' events first.
  Cascade,
  /// Move the events to another series first.
  Reassign(SeriesId),
}

/// Carry out `policy` for series `id`. Returns how many events were
/// deleted or moved.
pub async fn delete_series(client: &ApiClient, id: SeriesId, policy: DeletePolicy) -> Result<usize> {
  let events = client.events();
  let owned = events
    .list(&EventQuery {
      series_id: Some(id),
      ..Default::default()
    })
    .await?;

  match policy {
    DeletePolicy::Orphan => {}
    DeletePolicy::Cascade => events.delete_all(&EventFilter::for_series(id)).await?,
    DeletePolicy::Reassign(target) => {
      if target == id {
        bail!("cannot reassign events of series {id} to itself");
      }
      for event in &owned {
        events.update(event.id, &EventPatch::reassign(target)).await?;
      }
    }
  }

  client.series().delete(id).await?;
  Ok(match policy {
    DeletePolicy::Orphan => 0,
    _ => owned.len(),
  })
}

// ─── Dialog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOption {
  Cascade,
  Reassign,
  Orphan,
  Cancel,
}

impl DialogOption {
  pub fn label(self) -> &'static str {
    match self {
      Self::Cascade => "Delete its events too",
      Self::Reassign => "Move its events to",
      Self::Orphan => "Keep its events",
      Self::Cancel => "Cancel",
    }
  }
}

/// Outcome of a key press in the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
  None,
  Confirm(DeletePolicy),
  Cancel,
}

/// State of the "delete series" modal.
#[derive(Debug, Clone)]
pub struct DeleteDialog {
  pub series:      Series,
  pub event_count: usize,
  /// Candidate targets for reassignment: every other series.
  pub targets:     Vec<Series>,
  pub target:      usize,
  pub cursor:      usize,
}

impl DeleteDialog {
  pub fn new(series: Series, all: &[Series], event_count: usize) -> Self {
    let targets = all.iter().filter(|s| s.id != series.id).cloned().collect();
    Self {
      series,
      event_count,
      targets,
      target: 0,
      cursor: 0,
    }
  }

  /// Reassign is only offered when another series exists.
  pub fn options(&self) -> Vec<DialogOption> {
    let mut options = vec![DialogOption::Cascade];
    if !self.targets.is_empty() {
      options.push(DialogOption::Reassign);
    }
    options.extend([DialogOption::Orphan, DialogOption::Cancel]);
    options
  }

  pub fn current(&self) -> DialogOption {
    self
      .options()
      .get(self.cursor)
      .copied()
      .unwrap_or(DialogOption::Cancel)
  }

  pub fn target_series(&self) -> Option<&Series> { self.targets.get(self.target) }

  pub fn handle_key(&mut self, key: KeyEvent) -> DialogAction {
    let count = self.options().len();
    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => return DialogAction::Cancel,
      KeyCode::Down | KeyCode::Char('j') => self.cursor = (self.cursor + 1) % count,
      KeyCode::Up | KeyCode::Char('k') => self.cursor = (self.cursor + count - 1) % count,
      KeyCode::Left | KeyCode::Right if self.current() == DialogOption::Reassign => {
        let n = self.targets.len();
        self.target = match key.code {
          KeyCode::Left => (self.target + n - 1) % n,
          _ => (self.target + 1) % n,
        };
      }
      KeyCode::Enter => {
        return match self.current() {
          DialogOption::Cascade => DialogAction::Confirm(DeletePolicy::Cascade),
          DialogOption::Orphan => DialogAction::Confirm(DeletePolicy::Orphan),
          DialogOption::Reassign => match self.target_series() {
            Some(t) => DialogAction::Confirm(DeletePolicy::Reassign(t.id)),
            None => DialogAction::None,
          },
          DialogOption::Cancel => DialogAction::Cancel,
        };
      }
      _ => {}
    }
    DialogAction::None
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use crossterm::event::KeyModifiers;
  use logbook_core::{
    event::NewEvent,
    series::{NewSeries, SeriesQuery},
    value::ValueType,
  };
  use serde_json::json;

  use super::*;
  use crate::test_server;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  async fn seeded() -> (ApiClient, Series, Series) {
    let client = test_server::spawn().await;
    let a = client.series().create(&NewSeries::new("a", ValueType::Number)).await.unwrap();
    let b = client.series().create(&NewSeries::new("b", ValueType::Number)).await.unwrap();
    for (series, day) in [(&a, 1), (&a, 2), (&b, 3)] {
      client
        .events()
        .create(&NewEvent {
          series_id: series.id,
          value:     json!(day),
          date:      NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
          notes:     String::new(),
        })
        .await
        .unwrap();
    }
    (client, a, b)
  }

  async fn owners(client: &ApiClient) -> Vec<SeriesId> {
    let mut ids: Vec<_> = client
      .events()
      .list(&EventQuery::default())
      .await
      .unwrap()
      .into_iter()
      .map(|e| e.series_id)
      .collect();
    ids.sort();
    ids
  }

  #[tokio::test]
  async fn orphan_keeps_events() {
    let (client, a, b) = seeded().await;
    assert_eq!(delete_series(&client, a.id, DeletePolicy::Orphan).await.unwrap(), 0);
    assert_eq!(owners(&client).await, [a.id, a.id, b.id]);
    let remaining = client.series().list(&SeriesQuery::default()).await.unwrap();
    assert_eq!(remaining, vec![b]);
  }

  #[tokio::test]
  async fn cascade_removes_events() {
    let (client, a, b) = seeded().await;
    assert_eq!(delete_series(&client, a.id, DeletePolicy::Cascade).await.unwrap(), 2);
    assert_eq!(owners(&client).await, [b.id]);
  }

  #[tokio::test]
  async fn reassign_moves_events() {
    let (client, a, b) = seeded().await;
    assert_eq!(
      delete_series(&client, a.id, DeletePolicy::Reassign(b.id)).await.unwrap(),
      2
    );
    assert_eq!(owners(&client).await, [b.id, b.id, b.id]);

    let err = delete_series(&client, b.id, DeletePolicy::Reassign(b.id)).await.unwrap_err();
    assert!(err.to_string().contains("itself"));
  }

  fn series(id: SeriesId, name: &str) -> Series {
    Series {
      id,
      name: name.into(),
      value_type: ValueType::String,
      selection_options: vec![],
    }
  }

  #[test]
  fn reassign_needs_another_series() {
    let only = series(1, "only");
    let dialog = DeleteDialog::new(only.clone(), &[only], 4);
    assert_eq!(
      dialog.options(),
      [DialogOption::Cascade, DialogOption::Orphan, DialogOption::Cancel]
    );
  }

  #[test]
  fn dialog_navigation() {
    let all = [series(1, "a"), series(2, "b"), series(3, "c")];
    let mut dialog = DeleteDialog::new(all[0].clone(), &all, 2);
    assert_eq!(dialog.targets.len(), 2);

    assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogAction::Confirm(DeletePolicy::Cascade));

    dialog.handle_key(key(KeyCode::Down));
    assert_eq!(dialog.current(), DialogOption::Reassign);
    dialog.handle_key(key(KeyCode::Right));
    assert_eq!(
      dialog.handle_key(key(KeyCode::Enter)),
      DialogAction::Confirm(DeletePolicy::Reassign(3))
    );
    dialog.handle_key(key(KeyCode::Left));
    dialog.handle_key(key(KeyCode::Left));
    assert_eq!(dialog.target_series().unwrap().id, 3);

    dialog.handle_key(key(KeyCode::Up));
    dialog.handle_key(key(KeyCode::Up));
    assert_eq!(dialog.current(), DialogOption::Cancel);
    assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogAction::Cancel);
    assert_eq!(dialog.handle_key(key(KeyCode::Esc)), DialogAction::Cancel);
  }
}
