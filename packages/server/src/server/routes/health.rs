use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AxumAppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    store: StoreHealth,
}

#[derive(Serialize)]
pub struct StoreHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Pings the key-value store. Returns 200 OK when it answers, 503 Service
/// Unavailable otherwise.
pub async fn health_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store_health =
        match tokio::time::timeout(std::time::Duration::from_secs(5), state.store.ping()).await {
            Ok(Ok(())) => StoreHealth {
                status: "ok".to_string(),
                error: None,
            },
            Ok(Err(e)) => StoreHealth {
                status: "error".to_string(),
                error: Some(format!("Ping failed: {}", e)),
            },
            Err(_) => StoreHealth {
                status: "error".to_string(),
                error: Some("Ping timeout (>5s)".to_string()),
            },
        };

    let is_healthy = store_health.status == "ok";

    let overall_status = if is_healthy {
        "healthy"
    } else {
        "unhealthy"
    };

    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall_status.to_string(),
            store: store_health,
        }),
    )
}
