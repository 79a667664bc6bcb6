//! Series: a named, typed observation category (e.g. "mood", "exercise
//! minutes"). Events refer to a series by id.

use serde::{Deserialize, Serialize};

use crate::value::ValueType;

pub type SeriesId = i64;

/// A persisted series definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
  /// Assigned by the store.
  pub id:                SeriesId,
  /// Unique in practice; not enforced at this layer.
  pub name:              String,
  pub value_type:        ValueType,
  /// Only meaningful when `value_type` is [`ValueType::Selection`].
  #[serde(default)]
  pub selection_options: Vec<String>,
}

/// Body of `POST /series`: every series field except the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeries {
  pub name:              String,
  #[serde(default)]
  pub value_type:        ValueType,
  #[serde(default)]
  pub selection_options: Vec<String>,
}

impl NewSeries {
  pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
    Self {
      name: name.into(),
      value_type,
      selection_options: Vec::new(),
    }
  }
}

/// Body of `PATCH /series/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:              Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub value_type:        Option<ValueType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub selection_options: Option<Vec<String>>,
}

/// Query parameters accepted by `GET /series`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesQuery {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub value_type: Option<ValueType>,
}

/// Optional body of `DELETE /series`. An empty filter matches every series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesFilter {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub value_type: Option<ValueType>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn mood() -> Series {
    Series {
      id:                1,
      name:              "mood".into(),
      value_type:        ValueType::Selection,
      selection_options: vec!["good".into(), "bad".into()],
    }
  }

  #[test]
  fn new_series_defaults_to_string_without_options() {
    let input: NewSeries = serde_json::from_value(json!({ "name": "notes" })).unwrap();
    assert_eq!(input, NewSeries::new("notes", ValueType::String));
  }

  #[test]
  fn series_json_uses_camel_case() {
    let value = serde_json::to_value(mood()).unwrap();
    assert_eq!(
      value,
      json!({
        "id": 1,
        "name": "mood",
        "valueType": "SELECTION",
        "selectionOptions": ["good", "bad"],
      })
    );
    let back: Series = serde_json::from_value(value).unwrap();
    assert_eq!(back, mood());
  }

  #[test]
  fn empty_patch_serialises_to_empty_object() {
    assert_eq!(serde_json::to_value(SeriesPatch::default()).unwrap(), json!({}));
  }
}
