//! Event rows. The value field is parsed according to the chosen series'
//! value type.

use chrono::{Local, NaiveDate};
use logbook_core::{
  day,
  event::{Event, EventPatch, NewEvent},
  resource::EventResource,
  series::{Series, SeriesId},
  value,
};
use serde_json::Value;

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
    key:      "date",
    header:   "Date",
    kind:     ColumnKind::Date,
    editable: true,
    width:    10,
  },
  Column {
    key:      "seriesId",
    header:   "Series",
    kind:     ColumnKind::Choice,
    editable: true,
    width:    16,
  },
  Column {
    key:      "value",
    header:   "Value",
    kind:     ColumnKind::Text,
    editable: true,
    width:    14,
  },
  Column {
    key:      "notes",
    header:   "Notes",
    kind:     ColumnKind::Text,
    editable: true,
    width:    30,
  },
];

/// Every series, for the `seriesId` field.
pub fn series_choices(series: &[Series]) -> Vec<Choice> {
  series
    .iter()
    .map(|s| Choice::new(s.id.to_string(), s.name.clone()))
    .collect()
}

struct Parsed {
  series_id: SeriesId,
  value:     Value,
  date:      NaiveDate,
  notes:     String,
}

fn parse(form: &Form, series: &[Series]) -> Result<Parsed, String> {
  let series_id: SeriesId = form
    .value("seriesId")
    .trim()
    .parse()
    .map_err(|_| "choose a series".to_string())?;
  let owner = series
    .iter()
    .find(|s| s.id == series_id)
    .ok_or_else(|| format!("series {series_id} is not loaded"))?;
  let value = owner
    .value_type
    .parse_input(form.value("value"), &owner.selection_options)
    .map_err(|e| e.to_string())?;
  let date = day::parse(form.value("date"))?;

  Ok(Parsed {
    series_id,
    value,
    date,
    notes: form.value("notes").to_owned(),
  })
}

impl TableResource for EventResource {
  const CHANGE: Change = Change::Events;
  const TITLE: &'static str = "Event";

  fn columns() -> &'static [Column] { COLUMNS }

  fn field(record: &Event, key: &str) -> String {
    match key {
      "id" => record.id.to_string(),
      "date" => day::format(record.date),
      "seriesId" => record.series_id.to_string(),
      "value" => value::render(&record.value),
      "notes" => record.notes.clone(),
      _ => String::new(),
    }
  }

  fn cell(record: &Event, key: &str) -> String {
    match (key, &record.series) {
      ("seriesId", Some(series)) => series.name.clone(),
      ("seriesId", None) => format!("#{} (deleted)", record.series_id),
      _ => Self::field(record, key),
    }
  }

  fn default_field(key: &str) -> String {
    match key {
      "date" => day::format(Local::now().date_naive()),
      _ => String::new(),
    }
  }

  fn to_create(form: &Form, series: &[Series]) -> Result<NewEvent, String> {
    let p = parse(form, series)?;
    Ok(NewEvent {
      series_id: p.series_id,
      value:     p.value,
      date:      p.date,
      notes:     p.notes,
    })
  }

  fn to_patch(form: &Form, series: &[Series]) -> Result<EventPatch, String> {
    let p = parse(form, series)?;
    Ok(EventPatch {
      series_id: Some(p.series_id),
      value:     Some(p.value),
      date:      Some(p.date),
      notes:     Some(p.notes),
    })
  }
}

#[cfg(test)]
mod tests {
  use logbook_core::value::ValueType;
  use serde_json::json;

  use super::*;

  fn mood() -> Series {
    Series {
      id:                3,
      name:              "mood".into(),
      value_type:        ValueType::Selection,
      selection_options: vec!["good".into(), "bad".into()],
    }
  }

  fn form(series_id: &str, value: &str, date: &str) -> Form {
    let mut form = Form::new(
      "t",
      None,
      COLUMNS,
      |c| EventResource::default_field(c.key),
      |_| series_choices(&[mood()]),
    );
    form.set_value("seriesId", series_id);
    form.set_value("value", value);
    form.set_value("date", date);
    form
  }

  #[test]
  fn value_is_parsed_by_the_series_type() {
    let input = EventResource::to_create(&form("3", "good", "2025-04-01"), &[mood()]).unwrap();
    assert_eq!(input.value, json!("good"));
    assert_eq!(input.date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());

    let err = EventResource::to_create(&form("3", "meh", "2025-04-01"), &[mood()]).unwrap_err();
    assert!(err.contains("meh"), "{err}");
  }

  #[test]
  fn missing_series_and_bad_dates_are_reported() {
    assert_eq!(
      EventResource::to_create(&form("", "good", "2025-04-01"), &[mood()]).unwrap_err(),
      "choose a series"
    );
    assert!(EventResource::to_patch(&form("9", "good", "2025-04-01"), &[mood()]).is_err());
    assert!(EventResource::to_patch(&form("3", "good", "April"), &[mood()]).is_err());
  }

  #[test]
  fn cells_name_the_series_when_joined() {
    let mut event = Event {
      id:        1,
      series_id: 3,
      value:     json!("good"),
      date:      NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
      notes:     String::new(),
      series:    None,
    };
    assert_eq!(EventResource::cell(&event, "seriesId"), "#3 (deleted)");
    event.series = Some(mood());
    assert_eq!(EventResource::cell(&event, "seriesId"), "mood");
    assert_eq!(EventResource::field(&event, "seriesId"), "3");
    assert_eq!(EventResource::cell(&event, "value"), "good");
  }
}
