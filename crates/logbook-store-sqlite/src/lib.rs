//! SQLite backend for Logbook.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. [`SqliteStore`] owns the
//! connection and hands out one delegate per resource.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteEvents, SqliteSeries, SqliteStore};
