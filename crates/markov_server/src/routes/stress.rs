//! Stress-scenario endpoint

use axum::{extract::State, response::Json, routing::post, Router};
use markov_core::{apply_stress, StateRoles, StressFactors, StressReport, TransitionMatrix};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

/// Request body for `POST /api/v1/stress`
#[derive(Debug, Clone, Deserialize)]
pub struct StressRequest {
    /// Row-major transition matrix
    pub matrix: Vec<Vec<f64>>,
    /// Labels in matrix index order
    pub states: Vec<String>,
    /// Multiplier for the delinquency column (default 1.2)
    #[serde(default)]
    pub delinquency_factor: Option<f64>,
    /// Multiplier for the default column (default 1.3)
    #[serde(default)]
    pub default_factor: Option<f64>,
    /// Explicit state roles; inferred from labels when absent
    #[serde(default)]
    pub roles: Option<StateRoles>,
}

impl StressRequest {
    fn factors(&self) -> StressFactors {
        let defaults = StressFactors::default();
        StressFactors::new(
            self.delinquency_factor.unwrap_or(defaults.delinquency),
            self.default_factor.unwrap_or(defaults.default),
        )
    }
}

/// Response body for `POST /api/v1/stress`
#[derive(Debug, Clone, Serialize)]
pub struct StressResponse {
    /// Stressed matrix and stationary comparison
    #[serde(flatten)]
    pub report: StressReport,
    /// Labels as supplied
    pub states: Vec<String>,
}

/// Build the stress routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/stress", post(stress_handler))
}

/// POST /api/v1/stress - Shock a matrix and compare stationary distributions
async fn stress_handler(
    State(state): State<AppState>,
    Json(request): Json<StressRequest>,
) -> Result<Json<StressResponse>, ApiError> {
    let matrix = TransitionMatrix::from_rows(&request.matrix)?;
    let factors = request.factors();
    let report = apply_stress(
        &matrix,
        &request.states,
        factors,
        request.roles.as_ref(),
        &state.config.stationary_config(),
    )?;
    tracing::debug!(
        delinquency_state = ?report.factors.delinquency_state,
        default_state = ?report.factors.default_state,
        "stress scenario applied"
    );

    Ok(Json(StressResponse {
        report,
        states: request.states,
    }))
}
