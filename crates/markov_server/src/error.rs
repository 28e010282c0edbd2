//! HTTP error mapping for engine failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use markov_core::MarkovError;
use serde::{Deserialize, Serialize};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable kind (`invalid_input`, `numerical_error`, ...).
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// Engine error surfaced as `400 Bad Request`.
#[derive(Debug)]
pub struct ApiError(pub MarkovError);

impl From<MarkovError> for ApiError {
    fn from(err: MarkovError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.0, "request rejected");
        let body = ErrorResponse {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
