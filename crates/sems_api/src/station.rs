use axum::{Json, extract::State, response::IntoResponse};
use sems_engine::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::session::engine_error_to_response;

#[derive(Serialize, Deserialize)]
pub struct MonitoringMessage {
    pub message: String,
}

/// Name of the monitored station
pub async fn root(State(engine): State<Arc<Engine>>) -> impl IntoResponse {
    match engine.config() {
        Ok(config) => Json(MonitoringMessage {
            message: format!("Monitoring of Electra station {}", config.station_id),
        })
        .into_response(),
        Err(error) => engine_error_to_response(error).into_response(),
    }
}

/// Get current station configuration
pub async fn get_station_config(State(engine): State<Arc<Engine>>) -> impl IntoResponse {
    tracing::info!("Getting station configuration");
    match engine.config() {
        Ok(config) => Json(config).into_response(),
        Err(error) => engine_error_to_response(error).into_response(),
    }
}

/// Get station status with every charger, connector and battery boost
pub async fn get_station_status(State(engine): State<Arc<Engine>>) -> impl IntoResponse {
    tracing::info!("Getting station status");
    match engine.snapshot() {
        Ok(status) => Json(status).into_response(),
        Err(error) => engine_error_to_response(error).into_response(),
    }
}
