//! Event: a single dated observation belonging to a series.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

use crate::{Error, Result, series::{Series, SeriesId}};

pub type EventId = i64;

/// A persisted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
  pub id:        EventId,
  pub series_id: SeriesId,
  /// Shape depends on the owning series' [`ValueType`](crate::value::ValueType).
  #[serde(default)]
  pub value:     Value,
  #[serde(with = "crate::day")]
  pub date:      NaiveDate,
  #[serde(default)]
  pub notes:     String,
  /// The owning series; only populated for `?include=series`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub series:    Option<Series>,
}

/// Body of `POST /events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
  #[serde(deserialize_with = "series_ref")]
  pub series_id: SeriesId,
  #[serde(default)]
  pub value:     Value,
  #[serde(with = "crate::day")]
  pub date:      NaiveDate,
  #[serde(default)]
  pub notes:     String,
}

/// Body of `PATCH /events/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
  #[serde(
    default,
    deserialize_with = "optional_series_ref",
    skip_serializing_if = "Option::is_none"
  )]
  pub series_id: Option<SeriesId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub value:     Option<Value>,
  #[serde(
    default,
    with = "crate::day::option",
    skip_serializing_if = "Option::is_none"
  )]
  pub date:      Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes:     Option<String>,
}

impl EventPatch {
  /// A patch that only moves the event to another series.
  pub fn reassign(series_id: SeriesId) -> Self {
    Self {
      series_id: Some(series_id),
      ..Default::default()
    }
  }
}

// ─── Query / filter ──────────────────────────────────────────────────────────

/// Query parameters accepted by `GET /events`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
  /// Comma-separated relations to join; only `series` is known.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub include:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub series_id: Option<SeriesId>,
  #[serde(
    default,
    with = "crate::day::option",
    skip_serializing_if = "Option::is_none"
  )]
  pub from:      Option<NaiveDate>,
  #[serde(
    default,
    with = "crate::day::option",
    skip_serializing_if = "Option::is_none"
  )]
  pub to:        Option<NaiveDate>,
}

impl EventQuery {
  pub fn with_series() -> Self {
    Self {
      include: Some("series".into()),
      ..Default::default()
    }
  }

  /// Whether the owning series should be joined into each event.
  pub fn includes_series(&self) -> Result<bool> {
    let mut series = false;
    for part in self.include.iter().flat_map(|s| s.split(',')) {
      match part.trim() {
        "" => {}
        "series" => series = true,
        other => return Err(Error::UnknownInclude(other.to_owned())),
      }
    }
    Ok(series)
  }
}

/// Optional body of `DELETE /events`. An empty filter matches every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub series_id: Option<SeriesId>,
  #[serde(
    default,
    with = "crate::day::option",
    skip_serializing_if = "Option::is_none"
  )]
  pub from:      Option<NaiveDate>,
  #[serde(
    default,
    with = "crate::day::option",
    skip_serializing_if = "Option::is_none"
  )]
  pub to:        Option<NaiveDate>,
}

impl EventFilter {
  pub fn for_series(series_id: SeriesId) -> Self {
    Self {
      series_id: Some(series_id),
      ..Default::default()
    }
  }
}

// ─── Lenient series references ───────────────────────────────────────────────

/// Browser forms submit ids as strings as often as numbers; accept both, as
/// long as the value is integral.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRef {
  Int(i64),
  Float(f64),
  Text(String),
}

const NOT_A_NUMBER: &str = "seriesId must be a number";

fn parse_ref(raw: RawRef) -> Option<SeriesId> {
  match raw {
    RawRef::Int(n) => Some(n),
    RawRef::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
    RawRef::Float(_) => None,
    RawRef::Text(s) => s.trim().parse().ok(),
  }
}

fn series_ref<'de, D: Deserializer<'de>>(d: D) -> Result<SeriesId, D::Error> {
  let raw = RawRef::deserialize(d).map_err(|_| D::Error::custom(NOT_A_NUMBER))?;
  parse_ref(raw).ok_or_else(|| D::Error::custom(NOT_A_NUMBER))
}

fn optional_series_ref<'de, D: Deserializer<'de>>(
  d: D,
) -> Result<Option<SeriesId>, D::Error> {
  let raw =
    Option::<RawRef>::deserialize(d).map_err(|_| D::Error::custom(NOT_A_NUMBER))?;
  raw
    .map(|r| parse_ref(r).ok_or_else(|| D::Error::custom(NOT_A_NUMBER)))
    .transpose()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn new_event_accepts_numeric_string_series_ids() {
    let input: NewEvent = serde_json::from_value(json!({
      "seriesId": "7",
      "value": 30,
      "date": "2025-04-01T09:15:00.000Z",
    }))
    .unwrap();
    assert_eq!(input.series_id, 7);
    assert_eq!(input.date, date(2025, 4, 1));
    assert_eq!(input.notes, "");
  }

  #[test]
  fn non_numeric_series_id_is_rejected_with_message() {
    let err = serde_json::from_value::<EventPatch>(json!({ "seriesId": "seven" }))
      .unwrap_err();
    assert!(err.to_string().contains(NOT_A_NUMBER), "{err}");

    let err = serde_json::from_value::<EventPatch>(json!({ "seriesId": 1.5 }))
      .unwrap_err();
    assert!(err.to_string().contains(NOT_A_NUMBER), "{err}");
  }

  #[test]
  fn patch_without_series_id_leaves_it_unset() {
    let patch: EventPatch = serde_json::from_value(json!({ "notes": "hi" })).unwrap();
    assert_eq!(patch.series_id, None);
    assert_eq!(patch.notes.as_deref(), Some("hi"));
  }

  #[test]
  fn event_round_trips_with_day_dates() {
    let event = Event {
      id:        3,
      series_id: 1,
      value:     json!(true),
      date:      date(2025, 4, 3),
      notes:     "walked".into(),
      series:    None,
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["date"], json!("2025-04-03"));
    assert!(value.get("series").is_none());
    assert_eq!(serde_json::from_value::<Event>(value).unwrap(), event);
  }

  #[test]
  fn include_parsing() {
    assert!(!EventQuery::default().includes_series().unwrap());
    assert!(EventQuery::with_series().includes_series().unwrap());
    let bad = EventQuery {
      include: Some("series,owner".into()),
      ..Default::default()
    };
    assert!(matches!(bad.includes_series(), Err(Error::UnknownInclude(s)) if s == "owner"));
  }
}
