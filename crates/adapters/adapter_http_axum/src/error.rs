//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use kvsource_domain::error::InvalidArgumentError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps monitoring failures to an HTTP response with appropriate status code.
pub enum ApiError {
    /// The datasource exists in name only: nothing is open under it.
    NotOpen(String),
    /// The requested name is not a valid datasource name.
    InvalidName(InvalidArgumentError),
}

impl From<InvalidArgumentError> for ApiError {
    fn from(err: InvalidArgumentError) -> Self {
        Self::InvalidName(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotOpen(name) => (
                StatusCode::NOT_FOUND,
                format!("datasource '{name}' is not open"),
            ),
            Self::InvalidName(err) => (StatusCode::BAD_REQUEST, err.to_string()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
