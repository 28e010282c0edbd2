//! Expected-loss endpoint

use std::collections::BTreeMap;

use axum::{response::Json, routing::post, Router};
use markov_core::{expected_loss, LossParameters, LossReport, StateRoles, TransitionMatrix};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

/// Request body for `POST /api/v1/losses`
#[derive(Debug, Clone, Deserialize)]
pub struct LossRequest {
    /// Row-major transition matrix
    pub matrix: Vec<Vec<f64>>,
    /// Labels in matrix index order
    pub states: Vec<String>,
    /// Exposure at default per state
    #[serde(default)]
    pub ead: BTreeMap<String, f64>,
    /// Loss given default per state
    #[serde(default)]
    pub lgd: BTreeMap<String, f64>,
    /// Explicit state roles; the default state is otherwise found by label
    #[serde(default)]
    pub roles: Option<StateRoles>,
}

/// Build the loss routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/losses", post(losses_handler))
}

/// POST /api/v1/losses - Expected loss per state
async fn losses_handler(Json(request): Json<LossRequest>) -> Result<Json<LossReport>, ApiError> {
    let matrix = TransitionMatrix::from_rows(&request.matrix)?;
    let params = LossParameters {
        ead: request.ead,
        lgd: request.lgd,
    };
    let report = expected_loss(&matrix, &request.states, &params, request.roles.as_ref())?;
    tracing::debug!(
        default_state = %report.default_state,
        total = report.total,
        "expected loss computed"
    );
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

    fn credit_matrix() -> serde_json::Value {
        json!([[0.90, 0.08, 0.02], [0.10, 0.70, 0.20], [0.0, 0.0, 1.0]])
    }

    #[tokio::test]
    async fn test_expected_loss_per_state() {
        let (status, body) = post_json(
            router(),
            "/api/v1/losses",
            json!({
                "matrix": credit_matrix(),
                "states": ["Sano", "Moroso", "Incobrable"],
                "ead": { "Sano": 1000.0 },
                "lgd": { "Sano": 0.5 }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["default_state"], "Incobrable");

        let sano = &body["per_state"]["Sano"];
        assert_relative_eq!(sano["PD"].as_f64().unwrap(), 0.02, epsilon = 1e-15);
        assert_relative_eq!(sano["EL"].as_f64().unwrap(), 10.0, epsilon = 1e-12);
        assert_eq!(body["per_state"]["Moroso"]["EL"], 0.0);
        assert_relative_eq!(body["total"].as_f64().unwrap(), 10.0, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_explicit_default_role() {
        let (status, body) = post_json(
            router(),
            "/api/v1/losses",
            json!({
                "matrix": credit_matrix(),
                "states": ["Current", "Late", "Lost"],
                "ead": { "Current": 1000.0, "Elsewhere": 5.0 },
                "lgd": { "Current": 1.0 },
                "roles": { "Late": "default" }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["default_state"], "Late");
        assert_relative_eq!(
            body["per_state"]["Current"]["EL"].as_f64().unwrap(),
            80.0,
            epsilon = 1e-9
        );
        assert_eq!(body["ignored_labels"], json!(["Elsewhere"]));
    }

    #[tokio::test]
    async fn test_states_required() {
        let (status, _) = post_json(
            router(),
            "/api/v1/losses",
            json!({ "matrix": credit_matrix() }),
        )
        .await;
        assert!(status.is_client_error());
    }
}
