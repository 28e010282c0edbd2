//! Transition-matrix estimation endpoint

use axum::{response::Json, routing::post, Router};
use markov_core::estimation::estimate_from_records;
use markov_core::EstimationReport;
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

/// Request body for `POST /api/v1/matrix`
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixRequest {
    /// `[origin, destination]` pairs
    pub observations: Vec<Vec<String>>,
}

/// Build the matrix routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/matrix", post(estimate_handler))
}

/// POST /api/v1/matrix - Estimate a transition matrix and analyse it
async fn estimate_handler(
    Json(request): Json<MatrixRequest>,
) -> Result<Json<EstimationReport>, ApiError> {
    tracing::debug!(observations = request.observations.len(), "estimating matrix");
    let report = estimate_from_records(&request.observations)?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{create_test_state, post_json};
    use approx::assert_relative_eq;
    use axum::http::StatusCode;
    use serde_json::json;

    fn router() -> Router {
        routes().with_state(create_test_state())
    }

    #[tokio::test]
    async fn test_estimate_returns_full_report() {
        let mut observations = vec![json!(["A", "A"]); 9];
        observations.push(json!(["A", "B"]));
        observations.push(json!(["B", "B"]));

        let (status, body) =
            post_json(router(), "/api/v1/matrix", json!({ "observations": observations })).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(body["states"], json!(["A", "B"]));
        assert_relative_eq!(
            body["transition_matrix"][0][1].as_f64().unwrap(),
            0.1,
            epsilon = 1e-12
        );
        assert_eq!(body["count_matrix"], json!([[9, 1], [0, 1]]));
        assert_eq!(body["statistics"]["total_transitions"], 11);

        let transient = &body["state_classification"]["transient"][0];
        assert_eq!(transient["state"], "A");
        assert_relative_eq!(
            transient["mean_absorption_time"].as_f64().unwrap(),
            10.0,
            epsilon = 1e-9
        );
        assert!(body["spectral_properties"]["eigen"]["eigenvalues"]["dominant"].is_number());
        assert_eq!(body["markov_properties"]["is_stochastic"], true);
    }

    #[tokio::test]
    async fn test_empty_observations_rejected() {
        let (status, body) =
            post_json(router(), "/api/v1/matrix", json!({ "observations": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_short_record_rejected() {
        let (status, body) = post_json(
            router(),
            "/api/v1/matrix",
            json!({ "observations": [["A", "B"], ["A"]] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("observation 1"));
    }
}
