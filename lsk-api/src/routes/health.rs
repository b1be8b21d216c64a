//! `GET /healthz` - liveness/readiness probe, grounded on
//! `caliber-api::routes::health` but collapsed to one endpoint: the
//! engine has exactly one dependency (the pool) to check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        get,
        path = "/healthz",
        responses((status = 200, description = "Pool reachable", body = HealthResponse),
                  (status = 503, description = "Pool unreachable", body = HealthResponse)),
        tag = "Health",
    )
)]
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_seconds = state.start_time.elapsed().as_secs();

    match state.pool.get().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: HealthStatus::Healthy,
                uptime_seconds,
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: HealthStatus::Unhealthy,
                uptime_seconds,
                error: Some(e.to_string()),
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes_lowercase_status() {
        let body = HealthResponse {
            status: HealthStatus::Healthy,
            uptime_seconds: 12,
            error: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(!json.contains("\"error\""));
    }
}
