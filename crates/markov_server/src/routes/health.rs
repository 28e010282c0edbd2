//! Service index, health and readiness endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::AppState;

/// Endpoints listed by the service index.
pub const ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /ready",
    "POST /api/v1/matrix",
    "POST /api/v1/stationary",
    "POST /api/v1/losses",
    "POST /api/v1/stress",
];

/// Service index response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Service name
    pub name: String,
    /// Server version
    pub version: String,
    /// Available endpoints
    pub endpoints: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Server version
    pub version: String,
    /// Server uptime in seconds
    pub uptime_secs: u64,
    /// Environment name
    pub environment: String,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// Ready status
    pub ready: bool,
}

/// Build the health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
}

/// GET / - Service index
async fn index_handler() -> impl IntoResponse {
    Json(IndexResponse {
        name: "markov_server".to_string(),
        version: crate::VERSION.to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

/// GET /health - Health check endpoint
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        environment: state.config.environment.to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// GET /ready - Readiness endpoint
async fn ready_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(ReadyResponse { ready: true }))
}
