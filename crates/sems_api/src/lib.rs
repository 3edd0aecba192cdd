//! SEMS API Library
//!
//! This library provides the HTTP API for the Station Energy Management System.

pub mod config;
mod session;
mod station;

pub use session::{CreateSessionRequest, ErrorResponse, SessionResponse, StopSessionRequest};
pub use station::MonitoringMessage;

use axum::{
    Router,
    routing::{get, post},
};
use sems_engine::Engine;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(engine: Engine) -> Router {
    Router::new()
        .route("/", get(station::root))
        .route("/health", get(health_check))
        .route("/station/config", get(station::get_station_config))
        .route("/station/status", get(station::get_station_status))
        .route("/sessions", post(session::create_session))
        .route("/sessions/stop", post(session::stop_session))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(engine))
}
