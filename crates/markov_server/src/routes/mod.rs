//! Route modules for the markov server
//!
//! This module contains endpoint group-specific routers:
//! - health: Service index, health check and readiness
//! - matrix: Transition-matrix estimation with full analysis
//! - stationary: Long-run distribution of a matrix
//! - losses: Expected loss per state
//! - stress: Stress scenarios with before/after stationary comparison

pub mod health;
pub mod losses;
pub mod matrix;
pub mod stationary;
pub mod stress;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the main application router by merging all route modules
pub fn build_router(config: Arc<ServerConfig>) -> Router {
    let state = AppState::new(config);

    Router::new()
        .merge(health::routes())
        .merge(matrix::routes())
        .merge(stationary::routes())
        .merge(losses::routes())
        .merge(stress::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
