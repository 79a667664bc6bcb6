//! [`SqliteStore`] and its per-resource delegates.

use std::path::Path;

use logbook_core::{
  event::{Event, EventFilter, EventPatch, EventQuery, NewEvent},
  resource::{EventResource, SeriesResource},
  series::{NewSeries, Series, SeriesFilter, SeriesId, SeriesPatch, SeriesQuery},
  store::{Delegate, SeriesDirectory},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawEvent, RawSeries, encode_date, encode_options, encode_value, encode_value_type},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Logbook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The delegate for `/series`.
  pub fn series(&self) -> SqliteSeries { SqliteSeries { conn: self.conn.clone() } }

  /// The delegate for `/events`.
  pub fn events(&self) -> SqliteEvents { SqliteEvents { conn: self.conn.clone() } }
}

// ─── Series ──────────────────────────────────────────────────────────────────

/// Persistence delegate for series rows.
#[derive(Clone)]
pub struct SqliteSeries {
  conn: tokio_rusqlite::Connection,
}

impl SqliteSeries {
  async fn fetch(&self, id: SeriesId) -> Result<Option<Series>> {
    let raw: Option<RawSeries> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM series s WHERE s.id = ?1", RawSeries::COLUMNS),
              rusqlite::params![id],
              |row| RawSeries::from_row(row, 0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSeries::into_series).transpose()
  }
}

impl Delegate<SeriesResource> for SqliteSeries {
  type Error = Error;

  async fn list(&self, query: SeriesQuery) -> Result<Vec<Series>> {
    let value_type = query.value_type.map(encode_value_type);

    let raws: Vec<RawSeries> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM series s
           WHERE (?1 IS NULL OR s.value_type = ?1)
           ORDER BY s.id",
          RawSeries::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![value_type], |row| RawSeries::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSeries::into_series).collect()
  }

  async fn create(&self, input: NewSeries) -> Result<Series> {
    let options_str = encode_options(&input.selection_options)?;
    let type_str = encode_value_type(input.value_type);
    let name = input.name.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO series (name, value_type, selection_options) VALUES (?1, ?2, ?3)",
          rusqlite::params![name, type_str, options_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Series {
      id,
      name: input.name,
      value_type: input.value_type,
      selection_options: input.selection_options,
    })
  }

  async fn update(&self, id: i64, patch: SeriesPatch) -> Result<Series> {
    let name = patch.name;
    let type_str = patch.value_type.map(encode_value_type);
    let options_str = patch
      .selection_options
      .as_deref()
      .map(encode_options)
      .transpose()?;

    // COALESCE keeps every column the patch leaves out.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE series SET
             name              = COALESCE(?2, name),
             value_type        = COALESCE(?3, value_type),
             selection_options = COALESCE(?4, selection_options)
           WHERE id = ?1",
          rusqlite::params![id, name, type_str, options_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::SeriesNotFound(id));
    }
    self.fetch(id).await?.ok_or(Error::SeriesNotFound(id))
  }

  async fn delete(&self, id: i64) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM series WHERE id = ?1", rusqlite::params![id])?))
      .await?;

    if changed == 0 {
      return Err(Error::SeriesNotFound(id));
    }
    Ok(())
  }

  async fn delete_all(&self, filter: SeriesFilter) -> Result<u64> {
    let value_type = filter.value_type.map(encode_value_type);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM series WHERE (?1 IS NULL OR value_type = ?1)",
          rusqlite::params![value_type],
        )?)
      })
      .await?;

    Ok(removed as u64)
  }
}

impl SeriesDirectory for SqliteSeries {
  type Error = Error;

  async fn series_exists(&self, id: SeriesId) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row("SELECT 1 FROM series WHERE id = ?1", rusqlite::params![id], |_| Ok(true))
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// Persistence delegate for event rows.
#[derive(Clone)]
pub struct SqliteEvents {
  conn: tokio_rusqlite::Connection,
}

impl SqliteEvents {
  async fn fetch(&self, id: i64) -> Result<Option<Event>> {
    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM events e
                 LEFT JOIN series s ON s.id = e.series_id
                 WHERE e.id = ?1",
                RawEvent::COLUMNS
              ),
              rusqlite::params![id],
              RawEvent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(|r| r.into_event(false)).transpose()
  }
}

impl Delegate<EventResource> for SqliteEvents {
  type Error = Error;

  async fn list(&self, query: EventQuery) -> Result<Vec<Event>> {
    let include_series = query.includes_series()?;
    let series_id = query.series_id;
    let from = query.from.map(encode_date);
    let to = query.to.map(encode_date);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM events e
           LEFT JOIN series s ON s.id = e.series_id
           WHERE (?1 IS NULL OR e.series_id = ?1)
             AND (?2 IS NULL OR e.date >= ?2)
             AND (?3 IS NULL OR e.date <= ?3)
           ORDER BY e.date, e.id",
          RawEvent::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![series_id, from, to], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(|r| r.into_event(include_series)).collect()
  }

  async fn create(&self, input: NewEvent) -> Result<Event> {
    let value_str = encode_value(&input.value)?;
    let date_str = encode_date(input.date);
    let series_id = input.series_id;
    let notes = input.notes.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (series_id, value_json, date, notes) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![series_id, value_str, date_str, notes],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Event {
      id,
      series_id: input.series_id,
      value: input.value,
      date: input.date,
      notes: input.notes,
      series: None,
    })
  }

  async fn update(&self, id: i64, patch: EventPatch) -> Result<Event> {
    let series_id = patch.series_id;
    let value_str = patch.value.as_ref().map(encode_value).transpose()?;
    let date_str = patch.date.map(encode_date);
    let notes = patch.notes;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE events SET
             series_id  = COALESCE(?2, series_id),
             value_json = COALESCE(?3, value_json),
             date       = COALESCE(?4, date),
             notes      = COALESCE(?5, notes)
           WHERE id = ?1",
          rusqlite::params![id, series_id, value_str, date_str, notes],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::EventNotFound(id));
    }
    self.fetch(id).await?.ok_or(Error::EventNotFound(id))
  }

  async fn delete(&self, id: i64) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM events WHERE id = ?1", rusqlite::params![id])?))
      .await?;

    if changed == 0 {
      return Err(Error::EventNotFound(id));
    }
    Ok(())
  }

  async fn delete_all(&self, filter: EventFilter) -> Result<u64> {
    let series_id = filter.series_id;
    let from = filter.from.map(encode_date);
    let to = filter.to.map(encode_date);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM events
           WHERE (?1 IS NULL OR series_id = ?1)
             AND (?2 IS NULL OR date >= ?2)
             AND (?3 IS NULL OR date <= ?3)",
          rusqlite::params![series_id, from, to],
        )?)
      })
      .await?;

    Ok(removed as u64)
  }
}
