use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sems_core::{ConnectorId, Session, StationError};
use sems_engine::{Engine, EngineError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub connector_id: ConnectorId,
    pub vehicle_max_power: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSessionRequest {
    pub connector_id: ConnectorId,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session: Session,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn engine_error_to_response(error: EngineError) -> impl IntoResponse {
    let status = match &error {
        EngineError::Station(
            StationError::ChargerNotFound { .. } | StationError::ConnectorNotFound { .. },
        ) => StatusCode::NOT_FOUND,
        EngineError::Station(
            StationError::SessionAlreadyActive { .. } | StationError::SessionAlreadyInactive { .. },
        ) => StatusCode::CONFLICT,
        EngineError::Station(StationError::PowerOverflow { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::Station(StationError::InvalidBoostRemoval { .. }) | EngineError::Poisoned => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Start a charging session on a free connector
pub async fn create_session(
    State(engine): State<Arc<Engine>>,
    Json(payload): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    match engine.start_session(payload.connector_id, payload.vehicle_max_power) {
        Ok(session) => (StatusCode::OK, Json(SessionResponse { session })).into_response(),
        Err(error) => engine_error_to_response(error).into_response(),
    }
}

/// Stop the session running on a connector
pub async fn stop_session(
    State(engine): State<Arc<Engine>>,
    Json(payload): Json<StopSessionRequest>,
) -> impl IntoResponse {
    match engine.stop_session(payload.connector_id) {
        Ok(session) => (StatusCode::OK, Json(SessionResponse { session })).into_response(),
        Err(error) => engine_error_to_response(error).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, routing::post};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sems_core::{ChargerConfig, StationConfig};
    use tower::util::ServiceExt;

    /// Create the application router with session endpoints
    fn create_app(engine: Engine) -> Router {
        Router::new()
            .route("/sessions", post(create_session))
            .route("/sessions/stop", post(stop_session))
            .with_state(Arc::new(engine))
    }

    fn test_engine() -> Engine {
        Engine::new(StationConfig {
            station_id: "TEST_STATION".into(),
            grid_capacity: 400,
            chargers: vec![
                ChargerConfig {
                    id: "CP001".into(),
                    max_power: 200,
                    connectors: 2,
                },
                ChargerConfig {
                    id: "CP002".into(),
                    max_power: 150,
                    connectors: 1,
                },
            ],
            battery: None,
        })
        .unwrap()
    }

    fn json_request(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn create_body(charger_id: &str, idx: u8, vehicle_max_power: u32) -> String {
        serde_json::to_string(&CreateSessionRequest {
            connector_id: ConnectorId::new(charger_id, idx),
            vehicle_max_power,
        })
        .unwrap()
    }

    fn stop_body(charger_id: &str, idx: u8) -> String {
        serde_json::to_string(&StopSessionRequest {
            connector_id: ConnectorId::new(charger_id, idx),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_session() {
        let app = create_app(test_engine());

        let response = app
            .oneshot(json_request("/sessions", create_body("CP001", 1, 150)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let session_response: SessionResponse = serde_json::from_slice(&body).unwrap();

        let session = session_response.session;
        assert_eq!(session.connector_id(), &ConnectorId::new("CP001", 1));
        assert_eq!(session.vehicle_max_power(), 150);
        assert_eq!(session.allocated_power(), 150);
        assert!(!session.is_boosted());
    }

    #[tokio::test]
    async fn test_create_session_charger_not_found() {
        let app = create_app(test_engine());

        let response = app
            .oneshot(json_request("/sessions", create_body("CP999", 1, 150)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("Charger CP999 does not exist"));
    }

    #[tokio::test]
    async fn test_create_session_connector_not_found() {
        let app = create_app(test_engine());

        let response = app
            .oneshot(json_request("/sessions", create_body("CP002", 2, 150)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_session_connector_already_in_use() {
        let engine = test_engine();
        engine
            .start_session(ConnectorId::new("CP001", 1), 100)
            .unwrap();
        let app = create_app(engine);

        let response = app
            .oneshot(json_request("/sessions", create_body("CP001", 1, 150)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("is already in use"));
    }

    #[tokio::test]
    async fn test_create_session_power_overflow() {
        let engine = test_engine();
        engine
            .start_session(ConnectorId::new("CP001", 1), u32::MAX)
            .unwrap();
        let app = create_app(engine);

        let response = app
            .clone()
            .oneshot(json_request("/sessions", create_body("CP002", 1, 2)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("overflows the station demand"));

        // The station still answers after the rejected request
        let response = app
            .oneshot(json_request("/sessions/stop", stop_body("CP001", 1)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stop_session() {
        let engine = test_engine();
        engine
            .start_session(ConnectorId::new("CP001", 1), 150)
            .unwrap();
        let app = create_app(engine);

        let response = app
            .clone()
            .oneshot(json_request("/sessions/stop", stop_body("CP001", 1)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let session_response: SessionResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(session_response.session.vehicle_max_power(), 150);

        // The connector is free now, a second stop is refused
        let response = app
            .oneshot(json_request("/sessions/stop", stop_body("CP001", 1)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("has no active session"));
    }
}
