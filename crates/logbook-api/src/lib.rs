//! JSON REST API for Logbook.
//!
//! Exposes an axum [`Router`] over any pair of persistence delegates. CORS,
//! tracing layers and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", logbook_api::api_router(store.series(), store.events(), true))
//! ```

pub mod controller;
pub mod crud;
pub mod error;
pub mod events;
pub mod extract;
pub mod logging;
pub mod routes;

use axum::Router;
use logbook_core::{
  resource::{EventResource, SeriesResource},
  store::{Delegate, SeriesDirectory},
};

pub use controller::Controller;
pub use crud::Crud;
pub use error::ApiError;
pub use events::EventController;
pub use logging::Logged;
pub use routes::resource_router;

/// Build the `/series` and `/events` routes.
///
/// `series` doubles as the directory the event controller checks references
/// against. With `log_requests` every controller is wrapped in [`Logged`].
pub fn api_router<S, E>(series: S, events: E, log_requests: bool) -> Router<()>
where
  S: Delegate<SeriesResource> + SeriesDirectory + Clone + 'static,
  E: Delegate<EventResource> + 'static,
{
  let series_controller = Crud::<SeriesResource, _>::new(series.clone());
  let event_controller = EventController::new(Crud::<EventResource, _>::new(events), series);

  if log_requests {
    Router::new()
      .merge(resource_router::<SeriesResource, _>(Logged::new(series_controller)))
      .merge(resource_router::<EventResource, _>(Logged::new(event_controller)))
  } else {
    Router::new()
      .merge(resource_router::<SeriesResource, _>(series_controller))
      .merge(resource_router::<EventResource, _>(event_controller))
  }
}
