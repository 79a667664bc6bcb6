//! The [`Resource`] trait: a compile-time description of one record type
//! exposed through the generic CRUD layers.
//!
//! The server-side controllers, the persistence delegates and the client-side
//! API wrapper are all generic over a `Resource`, so the two record types
//! share every line of plumbing.

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};

use crate::{
  event::{Event, EventFilter, EventPatch, EventQuery, NewEvent},
  series::{NewSeries, Series, SeriesFilter, SeriesPatch, SeriesQuery},
};

/// Shared bound for everything that crosses the wire.
pub trait Wire:
  Serialize + DeserializeOwned + Debug + Send + Sync + 'static
{
}

impl<T> Wire for T where
  T: Serialize + DeserializeOwned + Debug + Send + Sync + 'static
{
}

pub trait Resource: Send + Sync + 'static {
  /// Path segment under `/api`, e.g. `"series"`.
  const NAME: &'static str;

  /// What the store returns.
  type Record: Wire + Clone;
  /// Body of a create request.
  type Create: Wire;
  /// Body of a partial update.
  type Patch: Wire + Default;
  /// List parameters, forwarded opaquely to the delegate.
  type Query: Wire + Default;
  /// Optional body of a delete-all request.
  type Filter: Wire + Default;

  fn id(record: &Self::Record) -> i64;
}

pub struct SeriesResource;

impl Resource for SeriesResource {
  const NAME: &'static str = "series";

  type Create = NewSeries;
  type Filter = SeriesFilter;
  type Patch = SeriesPatch;
  type Query = SeriesQuery;
  type Record = Series;

  fn id(record: &Series) -> i64 { record.id }
}

pub struct EventResource;

impl Resource for EventResource {
  const NAME: &'static str = "events";

  type Create = NewEvent;
  type Filter = EventFilter;
  type Patch = EventPatch;
  type Query = EventQuery;
  type Record = Event;

  fn id(record: &Event) -> i64 { record.id }
}
