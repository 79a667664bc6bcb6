//! An in-process API server on an ephemeral port, for client tests.

use logbook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;

use crate::client::{ApiClient, ApiConfig};

pub async fn spawn() -> ApiClient {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let app = axum::Router::new().nest(
    "/api",
    logbook_api::api_router(store.series(), store.events(), false),
  );

  let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
  let addr = listener.local_addr().expect("local addr");
  tokio::spawn(async move {
    axum::serve(listener, app).await.expect("serve");
  });

  ApiClient::new(ApiConfig {
    base_url: format!("http://{addr}"),
  })
  .expect("client")
}
