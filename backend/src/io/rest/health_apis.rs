//! Health check, API index and the JSON 404 fallback.

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::{ApiEndpoints, ApiInfoResponse, ErrorResponse, HealthResponse};
use tracing::debug;

use crate::domain::models::certificate::now_timestamp;
use crate::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Response {
    debug!("GET /api/health");

    let listing = state.certificate_service.list().await;
    let response = HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        environment: state.environment.to_string(),
        storage_mode: listing.mode.to_string(),
        certificates_count: listing.certificates.len(),
        timestamp: now_timestamp(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /
pub async fn api_info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        message: "Certificate Verification API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ApiEndpoints {
            health: "/api/health".to_string(),
            certificates: "/api/certificates".to_string(),
        },
    })
}

/// Any route that didn't match
pub async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    let body = ErrorResponse::new("Endpoint not found").with_path(uri.path());
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
