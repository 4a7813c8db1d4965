use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TestResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Connectivity probe used by the front-end
#[utoipa::path(
    get,
    path = "/api/test",
    responses(
        (status = 200, description = "API is reachable", body = TestResponse)
    ),
    tag = "health"
)]
pub async fn api_test() -> Json<TestResponse> {
    Json(TestResponse {
        message: "API is working".to_string(),
        timestamp: Utc::now(),
    })
}
