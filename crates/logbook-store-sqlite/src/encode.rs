//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings so that lexical comparison in
//! SQL matches calendar order. Event values and selection options are stored
//! as compact JSON.

use std::str::FromStr as _;

use chrono::NaiveDate;
use logbook_core::{day, event::Event, series::Series, value::ValueType};

use crate::{Error, Result};

// ─── ValueType ───────────────────────────────────────────────────────────────

pub fn encode_value_type(t: ValueType) -> &'static str {
  match t {
    ValueType::String => "STRING",
    ValueType::Number => "NUMBER",
    ValueType::Selection => "SELECTION",
    ValueType::Boolean => "BOOLEAN",
  }
}

pub fn decode_value_type(s: &str) -> Result<ValueType> {
  ValueType::from_str(s).map_err(|_| Error::Decode(format!("unknown value type: {s:?}")))
}

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { day::format(d) }

pub fn decode_date(s: &str) -> Result<NaiveDate> { day::parse(s).map_err(Error::Decode) }

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_options(options: &[String]) -> Result<String> {
  Ok(serde_json::to_string(options)?)
}

pub fn decode_options(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

pub fn encode_value(v: &serde_json::Value) -> Result<String> { Ok(serde_json::to_string(v)?) }

pub fn decode_value(s: &str) -> Result<serde_json::Value> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns read directly from a `series` row.
pub struct RawSeries {
  pub id:                i64,
  pub name:              String,
  pub value_type:        String,
  pub selection_options: String,
}

impl RawSeries {
  /// Columns in the order [`RawSeries::from_row`] expects, for `series`
  /// aliased as `s`.
  pub const COLUMNS: &'static str = "s.id, s.name, s.value_type, s.selection_options";

  pub fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(offset)?,
      name:              row.get(offset + 1)?,
      value_type:        row.get(offset + 2)?,
      selection_options: row.get(offset + 3)?,
    })
  }

  pub fn into_series(self) -> Result<Series> {
    Ok(Series {
      id:                self.id,
      name:              self.name,
      value_type:        decode_value_type(&self.value_type)?,
      selection_options: decode_options(&self.selection_options)?,
    })
  }
}

/// Raw columns of an `events` row, left-joined with its owning series.
pub struct RawEvent {
  pub id:         i64,
  pub series_id:  i64,
  pub value_json: String,
  pub date:       String,
  pub notes:      String,
  /// `None` when the referenced series no longer exists.
  pub series:     Option<RawSeries>,
}

impl RawEvent {
  /// Event columns followed by the joined series columns, for `events`
  /// aliased as `e` and `series` as `s`.
  pub const COLUMNS: &'static str = "e.id, e.series_id, e.value_json, e.date, e.notes, \
     s.id, s.name, s.value_type, s.selection_options";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let joined: Option<i64> = row.get(5)?;
    let series = match joined {
      Some(_) => Some(RawSeries::from_row(row, 5)?),
      None => None,
    };
    Ok(Self {
      id: row.get(0)?,
      series_id: row.get(1)?,
      value_json: row.get(2)?,
      date: row.get(3)?,
      notes: row.get(4)?,
      series,
    })
  }

  /// Decode into an [`Event`], attaching the owning series only when asked.
  pub fn into_event(self, include_series: bool) -> Result<Event> {
    let series = if include_series {
      self.series.map(RawSeries::into_series).transpose()?
    } else {
      None
    };

    Ok(Event {
      id: self.id,
      series_id: self.series_id,
      value: decode_value(&self.value_json)?,
      date: decode_date(&self.date)?,
      notes: self.notes,
      series,
    })
  }
}
