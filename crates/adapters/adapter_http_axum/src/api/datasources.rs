//! JSON handlers for open datasources.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use kvsource_app::ports::ConnectionHandle;
use kvsource_domain::monitor::OpenDatasource;
use kvsource_domain::name::DatasourceName;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of the list endpoint.
#[derive(Serialize)]
pub struct DatasourceList {
    pub size: usize,
    pub datasources: Vec<OpenDatasource>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<DatasourceList>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<OpenDatasource>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/datasources`
pub async fn list<H: ConnectionHandle>(State(state): State<AppState<H>>) -> ListResponse {
    let datasources = state.monitor.open_datasources();
    ListResponse::Ok(Json(DatasourceList {
        size: datasources.len(),
        datasources,
    }))
}

/// `GET /api/datasources/{name}`
pub async fn get<H: ConnectionHandle>(
    State(state): State<AppState<H>>,
    Path(name): Path<String>,
) -> Result<GetResponse, ApiError> {
    let name = DatasourceName::new(name)?;
    state
        .monitor
        .get(name.as_str())
        .map(|open| GetResponse::Ok(Json(open)))
        .ok_or_else(|| {
            tracing::debug!(datasource = %name, "lookup of datasource that is not open");
            ApiError::NotOpen(name.to_string())
        })
}
