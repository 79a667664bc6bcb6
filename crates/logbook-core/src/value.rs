//! Series value types and the conversion between user text and stored values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// The kind of value every event of a series carries.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
  strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ValueType {
  #[default]
  String,
  Number,
  Selection,
  Boolean,
}

impl ValueType {
  /// Convert text typed by a user into the JSON value stored for an event.
  ///
  /// `options` is only consulted for [`ValueType::Selection`].
  pub fn parse_input(self, input: &str, options: &[String]) -> Result<Value> {
    let trimmed = input.trim();
    let invalid = || Error::InvalidValue {
      value_type: self,
      input:      input.to_owned(),
    };

    match self {
      Self::String => Ok(Value::String(input.to_owned())),
      Self::Number => {
        if let Ok(n) = trimmed.parse::<i64>() {
          return Ok(Value::from(n));
        }
        trimmed
          .parse::<f64>()
          .ok()
          .and_then(serde_json::Number::from_f64)
          .map(Value::Number)
          .ok_or_else(invalid)
      }
      Self::Boolean => match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
        "false" | "no" | "n" | "0" => Ok(Value::Bool(false)),
        _ => Err(invalid()),
      },
      Self::Selection => options
        .iter()
        .find(|o| o.as_str() == trimmed)
        .map(|o| Value::String(o.clone()))
        .ok_or_else(|| Error::NotAnOption(trimmed.to_owned())),
    }
  }
}

/// Render a stored event value as display/edit text.
pub fn render(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use serde_json::json;

  use super::*;

  #[test]
  fn numbers_keep_integers_integral() {
    assert_eq!(ValueType::Number.parse_input(" 30 ", &[]).unwrap(), json!(30));
    assert_eq!(ValueType::Number.parse_input("2.5", &[]).unwrap(), json!(2.5));
    assert!(ValueType::Number.parse_input("lots", &[]).is_err());
  }

  #[test]
  fn booleans_accept_common_spellings() {
    assert_eq!(ValueType::Boolean.parse_input("Yes", &[]).unwrap(), json!(true));
    assert_eq!(ValueType::Boolean.parse_input("0", &[]).unwrap(), json!(false));
    assert!(ValueType::Boolean.parse_input("maybe", &[]).is_err());
  }

  #[test]
  fn selections_must_match_an_option() {
    let options = vec!["good".to_owned(), "bad".to_owned()];
    assert_eq!(
      ValueType::Selection.parse_input("bad", &options).unwrap(),
      json!("bad")
    );
    let err = ValueType::Selection.parse_input("meh", &options).unwrap_err();
    assert!(matches!(err, Error::NotAnOption(s) if s == "meh"));
  }

  #[test]
  fn wire_names_are_screaming_case() {
    assert_eq!(
      serde_json::to_value(ValueType::Selection).unwrap(),
      json!("SELECTION")
    );
    assert_eq!(ValueType::from_str("boolean").unwrap(), ValueType::Boolean);
    assert_eq!(ValueType::Number.to_string(), "NUMBER");
  }

  #[test]
  fn render_strips_string_quotes() {
    assert_eq!(render(&json!("calm")), "calm");
    assert_eq!(render(&json!(12)), "12");
    assert_eq!(render(&Value::Null), "");
  }
}
