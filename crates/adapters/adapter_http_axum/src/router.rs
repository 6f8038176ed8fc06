//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use kvsource_app::ports::ConnectionHandle;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the monitoring API under `/api` and includes a [`TraceLayer`] that
/// logs each HTTP request/response at the `DEBUG` level.
pub fn build<H: ConnectionHandle>(state: AppState<H>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
