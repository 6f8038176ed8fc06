//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod datasources;

use axum::Router;
use axum::routing::get;

use kvsource_app::ports::ConnectionHandle;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<H: ConnectionHandle>() -> Router<AppState<H>> {
    Router::new()
        .route("/datasources", get(datasources::list::<H>))
        .route("/datasources/{name}", get(datasources::get::<H>))
}
