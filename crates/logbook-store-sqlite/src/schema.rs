//! SQL schema for the Logbook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS series (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT NOT NULL,
    value_type        TEXT NOT NULL DEFAULT 'STRING',
    selection_options TEXT NOT NULL DEFAULT '[]'   -- JSON array of strings
);

-- series_id is intentionally not a FOREIGN KEY: references are checked by
-- the API layer, and deleting a series leaves its events in place.
CREATE TABLE IF NOT EXISTS events (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    series_id  INTEGER NOT NULL,
    value_json TEXT NOT NULL DEFAULT 'null',
    date       TEXT NOT NULL,                      -- YYYY-MM-DD
    notes      TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS events_series_idx ON events(series_id);
CREATE INDEX IF NOT EXISTS events_date_idx   ON events(date);

PRAGMA user_version = 1;
";
