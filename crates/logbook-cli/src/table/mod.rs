//! The generic CRUD table: rows of one resource plus its add/edit/delete
//! flows.
//!
//! A resource opts in by implementing [`TableResource`], which supplies
//! column metadata, cell rendering and the form → payload transforms.

mod events;
mod series;

pub use events::series_choices;
pub use series::value_type_choices;

use std::collections::HashMap;

use anyhow::Result;
use logbook_core::{resource::Resource, series::Series};
use tokio::sync::mpsc::UnboundedSender;

use crate::{client::CrudApi, form::Form};

// ─── Metadata ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
  Text,
  Number,
  Date,
  Choice,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
  pub key:      &'static str,
  pub header:   &'static str,
  pub kind:     ColumnKind,
  pub editable: bool,
  pub width:    u16,
}

/// One option of a [`ColumnKind::Choice`] field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
  pub value: String,
  pub label: String,
}

impl Choice {
  pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      value: value.into(),
      label: label.into(),
    }
  }
}

/// Which collection a mutation touched; other views refresh on receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
  Series,
  Events,
}

pub trait TableResource: Resource {
  const TITLE: &'static str;
  /// Sent after every successful mutation.
  const CHANGE: Change;
  /// When set, deleting a row is handed back to the caller instead of
  /// being issued directly.
  const CUSTOM_DELETE: bool = false;

  fn columns() -> &'static [Column];

  /// The editable text of a field, as loaded into the form.
  fn field(record: &Self::Record, key: &str) -> String;

  /// What the table shows in a cell.
  fn cell(record: &Self::Record, key: &str) -> String { Self::field(record, key) }

  /// Default text of a field in an empty add form.
  fn default_field(_key: &str) -> String { String::new() }

  /// Form → create payload. `series` is the current series list.
  fn to_create(form: &Form, series: &[Series]) -> Result<Self::Create, String>;

  /// Form → patch payload for the record being edited.
  fn to_patch(form: &Form, series: &[Series]) -> Result<Self::Patch, String>;
}

// ─── Outcomes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
  Saved,
  /// The form stays open; `form.error` says why.
  Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
  Nothing,
  Deleted,
  /// The resource uses a custom delete flow for this id.
  Deferred(i64),
}

// ─── Table ────────────────────────────────────────────────────────────────────

pub struct CrudTable<T: TableResource> {
  api:        CrudApi<T>,
  changes:    UnboundedSender<Change>,
  pub rows:   Vec<T::Record>,
  pub cursor: usize,
  pub query:  T::Query,
  choices:    HashMap<&'static str, Vec<Choice>>,
}

impl<T: TableResource> CrudTable<T> {
  pub fn new(api: CrudApi<T>, changes: UnboundedSender<Change>) -> Self {
    Self {
      api,
      changes,
      rows: Vec::new(),
      cursor: 0,
      query: T::Query::default(),
      choices: HashMap::new(),
    }
  }

  /// Options offered by the choice field `key`.
  pub fn set_choices(&mut self, key: &'static str, choices: Vec<Choice>) {
    self.choices.insert(key, choices);
  }

  pub fn choices(&self, key: &str) -> &[Choice] {
    self.choices.get(key).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn selected(&self) -> Option<&T::Record> { self.rows.get(self.cursor) }

  pub fn move_cursor(&mut self, step: isize) {
    if self.rows.is_empty() {
      self.cursor = 0;
      return;
    }
    let last = self.rows.len() as isize - 1;
    self.cursor = (self.cursor as isize + step).clamp(0, last) as usize;
  }

  /// Refetch rows with the current query.
  pub async fn reload(&mut self) -> Result<()> {
    self.rows = self.api.list(&self.query).await?;
    self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    Ok(())
  }

  fn form(&self, editing: Option<&T::Record>) -> Form {
    let title = match editing {
      Some(r) => format!("Edit {} #{}", T::TITLE, T::id(r)),
      None => format!("New {}", T::TITLE),
    };
    Form::new(
      title,
      editing.map(T::id),
      T::columns(),
      |c| match editing {
        Some(r) => T::field(r, c.key),
        None => T::default_field(c.key),
      },
      |c| self.choices(c.key).to_vec(),
    )
  }

  pub fn add_form(&self) -> Form { self.form(None) }

  pub fn edit_form(&self) -> Option<Form> { self.selected().map(|r| self.form(Some(r))) }

  /// Create or update from `form`. Transform and server errors are put on
  /// the form rather than returned.
  pub async fn submit(&mut self, form: &mut Form, series: &[Series]) -> Result<SubmitOutcome> {
    let saved = match form.editing {
      None => match T::to_create(form, series) {
        Ok(input) => self.api.create(&input).await.map(|r| T::id(&r)),
        Err(msg) => return Ok(reject(form, msg)),
      },
      Some(id) => match T::to_patch(form, series) {
        Ok(patch) => self.api.update(id, &patch).await.map(|r| T::id(&r)),
        Err(msg) => return Ok(reject(form, msg)),
      },
    };

    match saved {
      Ok(id) => {
        self.mutated().await?;
        if let Some(pos) = self.rows.iter().position(|r| T::id(r) == id) {
          self.cursor = pos;
        }
        Ok(SubmitOutcome::Saved)
      }
      Err(e) => Ok(reject(form, e.to_string())),
    }
  }

  /// Delete the selected row, or defer to the custom flow.
  pub async fn delete_selected(&mut self) -> Result<DeleteOutcome> {
    let Some(id) = self.selected().map(T::id) else {
      return Ok(DeleteOutcome::Nothing);
    };
    if T::CUSTOM_DELETE {
      return Ok(DeleteOutcome::Deferred(id));
    }
    self.api.delete(id).await?;
    self.mutated().await?;
    Ok(DeleteOutcome::Deleted)
  }

  /// Refetch and tell the rest of the app.
  pub async fn mutated(&mut self) -> Result<()> {
    self.reload().await?;
    // The receiver lives as long as the app; a closed channel means shutdown.
    let _ = self.changes.send(T::CHANGE);
    Ok(())
  }
}

fn reject(form: &mut Form, message: String) -> SubmitOutcome {
  form.error = Some(message);
  SubmitOutcome::Rejected
}

#[cfg(test)]
mod tests {
  use chrono::Local;
  use logbook_core::{
    resource::{EventResource, SeriesResource},
    value::ValueType,
  };
  use serde_json::json;
  use tokio::sync::mpsc;

  use super::*;
  use crate::test_server;

  async fn tables() -> (
    CrudTable<SeriesResource>,
    CrudTable<EventResource>,
    mpsc::UnboundedReceiver<Change>,
  ) {
    let client = test_server::spawn().await;
    let (tx, rx) = mpsc::unbounded_channel();
    (
      CrudTable::new(client.series(), tx.clone()),
      CrudTable::new(client.events(), tx),
      rx,
    )
  }

  #[tokio::test]
  async fn add_edit_and_invalidate() {
    let (mut series, _events, mut rx) = tables().await;
    series.set_choices("valueType", super::series::value_type_choices());

    let mut form = series.add_form();
    form.set_value("name", "mood");
    form.set_value("valueType", "SELECTION");
    form.set_value("selectionOptions", "good, bad");
    assert_eq!(series.submit(&mut form, &[]).await.unwrap(), SubmitOutcome::Saved);
    assert_eq!(rx.try_recv().unwrap(), Change::Series);

    assert_eq!(series.rows.len(), 1);
    assert_eq!(series.rows[0].selection_options, ["good", "bad"]);
    assert_eq!(series.rows[0].value_type, ValueType::Selection);

    let mut form = series.edit_form().unwrap();
    assert_eq!(form.value("selectionOptions"), "good, bad");
    form.set_value("name", "feeling");
    assert_eq!(series.submit(&mut form, &[]).await.unwrap(), SubmitOutcome::Saved);
    assert_eq!(series.rows[0].name, "feeling");
    assert_eq!(series.rows[0].value_type, ValueType::Selection);
  }

  #[tokio::test]
  async fn transform_and_server_errors_stay_on_the_form() {
    let (mut series, mut events, mut rx) = tables().await;

    let mut form = series.add_form();
    assert_eq!(series.submit(&mut form, &[]).await.unwrap(), SubmitOutcome::Rejected);
    assert_eq!(form.error.as_deref(), Some("name is required"));

    form.set_value("name", "steps");
    form.set_value("valueType", "NUMBER");
    series.submit(&mut form, &[]).await.unwrap();
    let steps = series.rows[0].clone();
    rx.try_recv().unwrap();

    let mut form = events.add_form();
    form.set_value("seriesId", steps.id.to_string());
    form.set_value("value", "lots");
    assert_eq!(
      events.submit(&mut form, &series.rows).await.unwrap(),
      SubmitOutcome::Rejected
    );
    assert!(form.error.as_deref().unwrap().contains("NUMBER"));

    // A series that vanished server-side is reported by the server.
    let ghost = logbook_core::series::Series {
      id: steps.id + 1,
      ..steps.clone()
    };
    let mut form = events.add_form();
    form.set_value("seriesId", ghost.id.to_string());
    form.set_value("value", "3");
    assert_eq!(
      events.submit(&mut form, &[ghost]).await.unwrap(),
      SubmitOutcome::Rejected
    );
    assert!(form.error.as_deref().unwrap().contains("does not exist"));
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test]
  async fn events_form_defaults_and_delete() {
    let (mut series, mut events, mut rx) = tables().await;
    let mut form = series.add_form();
    form.set_value("name", "walked");
    form.set_value("valueType", "BOOLEAN");
    series.submit(&mut form, &[]).await.unwrap();
    rx.try_recv().unwrap();

    let mut form = events.add_form();
    assert_eq!(form.value("date"), Local::now().date_naive().to_string());
    form.set_value("seriesId", series.rows[0].id.to_string());
    form.set_value("value", "yes");
    form.set_value("date", "2025-04-03");
    assert_eq!(
      events.submit(&mut form, &series.rows).await.unwrap(),
      SubmitOutcome::Saved
    );
    assert_eq!(rx.try_recv().unwrap(), Change::Events);
    assert_eq!(events.rows[0].value, json!(true));

    assert_eq!(events.delete_selected().await.unwrap(), DeleteOutcome::Deleted);
    assert!(events.rows.is_empty());
    assert_eq!(events.delete_selected().await.unwrap(), DeleteOutcome::Nothing);

    // Series rows go through the delete dialog instead.
    let id = series.rows[0].id;
    assert_eq!(series.delete_selected().await.unwrap(), DeleteOutcome::Deferred(id));
    assert_eq!(series.rows.len(), 1);
  }

  #[test]
  fn cursor_is_clamped() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let client = crate::client::ApiClient::new(crate::client::ApiConfig {
      base_url: "http://localhost:1".into(),
    })
    .unwrap();
    let mut table = CrudTable::<SeriesResource>::new(client.series(), tx);
    table.move_cursor(3);
    assert_eq!(table.cursor, 0);
    table.rows = vec![
      logbook_core::series::Series {
        id:                1,
        name:              "a".into(),
        value_type:        ValueType::String,
        selection_options: vec![],
      };
      3
    ];
    table.move_cursor(5);
    assert_eq!(table.cursor, 2);
    table.move_cursor(-1);
    assert_eq!(table.cursor, 1);
  }
}
