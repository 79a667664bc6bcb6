//! Day-granularity date encoding.
//!
//! Dates always serialise as `YYYY-MM-DD`. On input, a full timestamp (as
//! produced by browsers and most JSON encoders) is accepted too and truncated
//! to its calendar date; the time of day is not significant.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

/// Wire format for every date in the API.
pub const FORMAT: &str = "%Y-%m-%d";

/// Parse a date or a timestamp into a [`NaiveDate`].
pub fn parse(raw: &str) -> Result<NaiveDate, String> {
  let raw = raw.trim();
  if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
    return Ok(date);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.date_naive());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
    return Ok(dt.date());
  }
  Err(format!("invalid date: {raw:?}"))
}

pub fn format(date: NaiveDate) -> String { date.format(FORMAT).to_string() }

pub fn serialize<S: Serializer>(
  date: &NaiveDate,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  serializer.collect_str(&date.format(FORMAT))
}

pub fn deserialize<'de, D: Deserializer<'de>>(
  deserializer: D,
) -> Result<NaiveDate, D::Error> {
  let raw = String::deserialize(deserializer)?;
  parse(&raw).map_err(D::Error::custom)
}

/// The same encoding for `Option<NaiveDate>` fields.
pub mod option {
  use chrono::NaiveDate;
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    match date {
      Some(d) => super::serialize(d, serializer),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Option<NaiveDate>, D::Error> {
    Option::<String>::deserialize(deserializer)?
      .filter(|s| !s.trim().is_empty())
      .map(|s| super::parse(&s).map_err(D::Error::custom))
      .transpose()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_date_parses() {
    assert_eq!(
      parse("2025-04-01").unwrap(),
      NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    );
  }

  #[test]
  fn timestamps_truncate_to_their_date() {
    let expected = NaiveDate::from_ymd_opt(2025, 4, 3).unwrap();
    assert_eq!(parse("2025-04-03T18:30:00.000Z").unwrap(), expected);
    assert_eq!(parse("2025-04-03T23:59:59+02:00").unwrap(), expected);
    assert_eq!(parse("2025-04-03T08:00:00").unwrap(), expected);
  }

  #[test]
  fn garbage_is_rejected() {
    assert!(parse("yesterday").is_err());
    assert!(parse("2025-13-01").is_err());
  }
}
