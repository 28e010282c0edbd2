//! Stationary-distribution endpoint

use axum::{extract::State, response::Json, routing::post, Router};
use markov_core::{stationary_distribution, StationaryConfig, StationaryResult, TransitionMatrix};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

/// Request body for `POST /api/v1/stationary`
#[derive(Debug, Clone, Deserialize)]
pub struct StationaryRequest {
    /// Row-major transition matrix
    pub matrix: Vec<Vec<f64>>,
    /// Optional labels, echoed back and checked against the matrix size
    #[serde(default)]
    pub states: Option<Vec<String>>,
    /// Overrides the server's configured tolerance
    #[serde(default)]
    pub tolerance: Option<f64>,
    /// Overrides the server's configured iteration cap
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

/// Response body for `POST /api/v1/stationary`
#[derive(Debug, Clone, Serialize)]
pub struct StationaryResponse {
    /// Solver output
    #[serde(flatten)]
    pub result: StationaryResult,
    /// Labels as supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
}

/// Build the stationary routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/stationary", post(stationary_handler))
}

/// Request overrides on top of the server defaults.
pub(crate) fn solver_config(
    defaults: StationaryConfig,
    tolerance: Option<f64>,
    max_iterations: Option<usize>,
) -> Result<StationaryConfig, ApiError> {
    let config = StationaryConfig {
        tolerance: tolerance.unwrap_or(defaults.tolerance),
        max_iterations: max_iterations.unwrap_or(defaults.max_iterations),
    };
    config.validate()?;
    Ok(config)
}

/// POST /api/v1/stationary - Long-run distribution
async fn stationary_handler(
    State(state): State<AppState>,
    Json(request): Json<StationaryRequest>,
) -> Result<Json<StationaryResponse>, ApiError> {
    let matrix = TransitionMatrix::from_rows(&request.matrix)?;
    if let Some(states) = &request.states {
        matrix.check_labels(states)?;
    }
    let config = solver_config(
        state.config.stationary_config(),
        request.tolerance,
        request.max_iterations,
    )?;

    let result = stationary_distribution(&matrix, &config)?;
    tracing::debug!(
        method = ?result.method,
        iterations = result.iterations,
        "stationary distribution computed"
    );

    Ok(Json(StationaryResponse {
        result,
        states: request.states,
    }))
}
