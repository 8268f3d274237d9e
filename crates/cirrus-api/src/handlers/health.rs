//! Health endpoints
//!
//! `/health` probes the provider with a one-record listing. A failing probe
//! degrades the report but still returns 200: the process itself is up, and
//! orchestrators should not restart it for a provider outage.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use cirrus_core::models::ResourceBucket;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health with provider status", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    match state.provider.list(ResourceBucket::Raw, 1).await {
        Ok(_) => Json(HealthResponse {
            status: "healthy".to_string(),
            provider: "healthy".to_string(),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "provider health probe failed");
            Json(HealthResponse {
                status: "degraded".to_string(),
                provider: format!("unhealthy: {}", e),
            })
        }
    }
}

pub async fn liveness() -> &'static str {
    "OK"
}
