//! Modal add/edit form driven by column metadata.

use crossterm::event::{KeyCode, KeyEvent};

use crate::table::{Choice, Column, ColumnKind};

#[derive(Debug, Clone)]
pub struct FormField {
  pub key:     &'static str,
  pub label:   &'static str,
  pub kind:    ColumnKind,
  pub value:   String,
  /// Only used by [`ColumnKind::Choice`] fields.
  pub choices: Vec<Choice>,
}

impl FormField {
  /// Label of the current choice, or the raw value.
  pub fn display(&self) -> &str {
    self
      .choices
      .iter()
      .find(|c| c.value == self.value)
      .map(|c| c.label.as_str())
      .unwrap_or(&self.value)
  }

  fn cycle(&mut self, step: isize) {
    if self.choices.is_empty() {
      return;
    }
    let len = self.choices.len() as isize;
    let current = self
      .choices
      .iter()
      .position(|c| c.value == self.value)
      .map(|i| i as isize)
      .unwrap_or(-1);
    let next = (current + step).rem_euclid(len) as usize;
    self.value = self.choices[next].value.clone();
  }
}

/// What the caller should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
  None,
  Submit,
  Cancel,
}

#[derive(Debug, Clone)]
pub struct Form {
  pub title:   String,
  /// `Some(id)` when editing an existing record.
  pub editing: Option<i64>,
  pub fields:  Vec<FormField>,
  pub focus:   usize,
  /// Shown under the fields after a failed submit.
  pub error:   Option<String>,
}

impl Form {
  /// A form over the editable `columns`, with values from `value_of`.
  pub fn new(
    title: impl Into<String>,
    editing: Option<i64>,
    columns: &[Column],
    mut value_of: impl FnMut(&Column) -> String,
    mut choices_of: impl FnMut(&Column) -> Vec<Choice>,
  ) -> Self {
    let fields = columns
      .iter()
      .filter(|c| c.editable)
      .map(|c| {
        let choices = match c.kind {
          ColumnKind::Choice => choices_of(c),
          _ => Vec::new(),
        };
        let mut value = value_of(c);
        if c.kind == ColumnKind::Choice && value.is_empty() {
          value = choices.first().map(|ch| ch.value.clone()).unwrap_or_default();
        }
        FormField {
          key: c.key,
          label: c.header,
          kind: c.kind,
          value,
          choices,
        }
      })
      .collect();

    Self {
      title: title.into(),
      editing,
      fields,
      focus: 0,
      error: None,
    }
  }

  /// Current text of the field named `key`; empty if there is none.
  pub fn value(&self, key: &str) -> &str {
    self
      .fields
      .iter()
      .find(|f| f.key == key)
      .map(|f| f.value.as_str())
      .unwrap_or("")
  }

  pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
    if let Some(f) = self.fields.iter_mut().find(|f| f.key == key) {
      f.value = value.into();
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
    let count = self.fields.len();
    match key.code {
      KeyCode::Esc => return FormAction::Cancel,
      KeyCode::Enter => return FormAction::Submit,
      KeyCode::Tab | KeyCode::Down if count > 0 => self.focus = (self.focus + 1) % count,
      KeyCode::BackTab | KeyCode::Up if count > 0 => {
        self.focus = (self.focus + count - 1) % count
      }
      code => {
        let Some(field) = self.fields.get_mut(self.focus) else {
          return FormAction::None;
        };
        match (field.kind, code) {
          (ColumnKind::Choice, KeyCode::Left) => field.cycle(-1),
          (ColumnKind::Choice, KeyCode::Right | KeyCode::Char(' ')) => field.cycle(1),
          (ColumnKind::Choice, _) => {}
          (_, KeyCode::Backspace) => {
            field.value.pop();
          }
          (ColumnKind::Number, KeyCode::Char(c)) if !(c.is_ascii_digit() || c == '-') => {}
          (_, KeyCode::Char(c)) => field.value.push(c),
          _ => {}
        }
      }
    }
    FormAction::None
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyModifiers;

  use super::*;

  const COLUMNS: &[Column] = &[
    Column {
      key:      "id",
      header:   "ID",
      kind:     ColumnKind::Number,
      editable: false,
      width:    4,
    },
    Column {
      key:      "name",
      header:   "Name",
      kind:     ColumnKind::Text,
      editable: true,
      width:    12,
    },
    Column {
      key:      "kind",
      header:   "Kind",
      kind:     ColumnKind::Choice,
      editable: true,
      width:    8,
    },
  ];

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn form() -> Form {
    Form::new("New", None, COLUMNS, |_| String::new(), |_| {
      vec![Choice::new("a", "Alpha"), Choice::new("b", "Beta")]
    })
  }

  #[test]
  fn only_editable_columns_become_fields() {
    let form = form();
    let keys: Vec<_> = form.fields.iter().map(|f| f.key).collect();
    assert_eq!(keys, ["name", "kind"]);
    // Empty choice fields start at the first option.
    assert_eq!(form.value("kind"), "a");
    assert_eq!(form.fields[1].display(), "Alpha");
  }

  #[test]
  fn typing_focus_and_cycling() {
    let mut form = form();
    for c in "mood".chars() {
      assert_eq!(form.handle_key(key(KeyCode::Char(c))), FormAction::None);
    }
    form.handle_key(key(KeyCode::Backspace));
    assert_eq!(form.value("name"), "moo");

    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.value("kind"), "b");
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.value("kind"), "a");
    form.handle_key(key(KeyCode::Left));
    assert_eq!(form.value("kind"), "b");
    // Typing into a choice field is ignored.
    form.handle_key(key(KeyCode::Char('x')));
    assert_eq!(form.value("kind"), "b");

    form.handle_key(key(KeyCode::Tab));
    assert_eq!(form.focus, 0);
    assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Submit);
    assert_eq!(form.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
  }
}
