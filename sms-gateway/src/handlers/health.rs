use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "sms-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the gateway is ready when its SMS provider is usable.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.sms_provider.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "SMS provider failed readiness check");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
