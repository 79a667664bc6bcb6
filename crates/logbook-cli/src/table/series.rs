//! Series rows.

use std::str::FromStr as _;

use logbook_core::{
  resource::SeriesResource,
  series::{NewSeries, Series, SeriesPatch},
  value::ValueType,
};
use strum::IntoEnumIterator as _;

use super::{Change, Choice, Column, ColumnKind, TableResource};
use crate::form::Form;

const COLUMNS: &[Column] = &[
  Column {
    key:      "id",
    header:   "ID",
    kind:     ColumnKind::Number,
    editable: false,
    width:    5,
  },
  Column {
    key:      "name",
    header:   "Name",
    kind:     ColumnKind::Text,
    editable: true,
    width:    20,
  },
  Column {
    key:      "valueType",
    header:   "Type",
    kind:     ColumnKind::Choice,
    editable: true,
    width:    10,
  },
  Column {
    key:      "selectionOptions",
    header:   "Options",
    kind:     ColumnKind::Text,
    editable: true,
    width:    30,
  },
];

/// Every value type, for the `valueType` field.
pub fn value_type_choices() -> Vec<Choice> {
  ValueType::iter()
    .map(|t| Choice::new(t.as_ref(), t.as_ref().to_lowercase()))
    .collect()
}

fn split_options(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect()
}

struct Parsed {
  name:              String,
  value_type:        ValueType,
  selection_options: Vec<String>,
}

fn parse(form: &Form) -> Result<Parsed, String> {
  let name = form.value("name").trim();
  if name.is_empty() {
    return Err("name is required".into());
  }
  let raw_type = form.value("valueType");
  let value_type =
    ValueType::from_str(raw_type).map_err(|_| format!("unknown value type {raw_type:?}"))?;
  let selection_options = match value_type {
    ValueType::Selection => split_options(form.value("selectionOptions")),
    _ => Vec::new(),
  };
  if value_type == ValueType::Selection && selection_options.is_empty() {
    return Err("a selection series needs at least one option".into());
  }
  Ok(Parsed {
    name: name.to_owned(),
    value_type,
    selection_options,
  })
}

impl TableResource for SeriesResource {
  const CHANGE: Change = Change::Series;
  const CUSTOM_DELETE: bool = true;
  const TITLE: &'static str = "Series";

  fn columns() -> &'static [Column] { COLUMNS }

  fn field(record: &Series, key: &str) -> String {
    match key {
      "id" => record.id.to_string(),
      "name" => record.name.clone(),
      "valueType" => record.value_type.to_string(),
      "selectionOptions" => record.selection_options.join(", "),
      _ => String::new(),
    }
  }

  fn cell(record: &Series, key: &str) -> String {
    match key {
      "valueType" => record.value_type.as_ref().to_lowercase(),
      _ => Self::field(record, key),
    }
  }

  fn default_field(key: &str) -> String {
    match key {
      "valueType" => ValueType::default().to_string(),
      _ => String::new(),
    }
  }

  fn to_create(form: &Form, _series: &[Series]) -> Result<NewSeries, String> {
    let p = parse(form)?;
    Ok(NewSeries {
      name:              p.name,
      value_type:        p.value_type,
      selection_options: p.selection_options,
    })
  }

  fn to_patch(form: &Form, _series: &[Series]) -> Result<SeriesPatch, String> {
    let p = parse(form)?;
    Ok(SeriesPatch {
      name:              Some(p.name),
      value_type:        Some(p.value_type),
      selection_options: Some(p.selection_options),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form(name: &str, value_type: &str, options: &str) -> Form {
    let mut form = Form::new("t", None, COLUMNS, |_| String::new(), |_| value_type_choices());
    form.set_value("name", name);
    form.set_value("valueType", value_type);
    form.set_value("selectionOptions", options);
    form
  }

  #[test]
  fn options_are_split_and_only_kept_for_selections() {
    let input = SeriesResource::to_create(&form(" mood ", "SELECTION", "good,, bad ,"), &[]).unwrap();
    assert_eq!(input.name, "mood");
    assert_eq!(input.selection_options, ["good", "bad"]);

    let input = SeriesResource::to_create(&form("steps", "NUMBER", "ignored"), &[]).unwrap();
    assert!(input.selection_options.is_empty());
  }

  #[test]
  fn invalid_forms_explain_themselves() {
    assert_eq!(
      SeriesResource::to_create(&form("", "STRING", ""), &[]).unwrap_err(),
      "name is required"
    );
    assert!(SeriesResource::to_create(&form("mood", "SELECTION", " , "), &[]).is_err());
    assert!(SeriesResource::to_patch(&form("mood", "COLOUR", ""), &[]).is_err());
  }

  #[test]
  fn choices_cover_every_value_type() {
    let values: Vec<_> = value_type_choices().into_iter().map(|c| c.value).collect();
    assert_eq!(values, ["STRING", "NUMBER", "SELECTION", "BOOLEAN"]);
  }
}
