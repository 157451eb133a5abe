//! # REST API for Certificates
//!
//! Endpoints for listing, issuing, editing and revoking certificates.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use shared::{CreateCertificateRequest, UpdateCertificateRequest};
use tracing::{error, info};

use crate::io::rest::body::{BodyRejection, JsonOrForm};
use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::certificate_mapper::CertificateMapper;
use crate::AppState;

/// Router for certificate APIs, nested under `/api/certificates`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_certificates).post(create_certificate))
        .route("/:id", put(update_certificate).delete(delete_certificate))
}

/// List all certificates, newest first
pub async fn list_certificates(State(state): State<AppState>) -> Response {
    info!("GET /api/certificates");

    let result = state.certificate_service.list().await;
    if let Some(read_error) = &result.read_error {
        error!(error = %read_error, "Serving empty certificate list after read failure");
    }

    (StatusCode::OK, Json(CertificateMapper::to_list_response(result))).into_response()
}

/// Issue a new certificate
pub async fn create_certificate(
    State(state): State<AppState>,
    payload: Result<JsonOrForm<CreateCertificateRequest>, BodyRejection>,
) -> Response {
    let request = match payload {
        Ok(JsonOrForm(request)) => request,
        Err(rejection) => return ApiError::invalid_body(rejection, state.environment).into_response(),
    };
    info!("POST /api/certificates - request: {:?}", request);

    let command = CertificateMapper::to_create_command(request);
    match state.certificate_service.create(command).await {
        Ok(result) => {
            let response = CertificateMapper::to_create_response(result);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create certificate: {}", e);
            ApiError::from_domain(e, state.environment).into_response()
        }
    }
}

/// Apply a partial update (database mode only)
pub async fn update_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<JsonOrForm<UpdateCertificateRequest>, BodyRejection>,
) -> Response {
    let request = match payload {
        Ok(JsonOrForm(request)) => request,
        Err(rejection) => return ApiError::invalid_body(rejection, state.environment).into_response(),
    };
    info!("PUT /api/certificates/{} - request: {:?}", id, request);

    let command = CertificateMapper::to_update_command(request);
    match state.certificate_service.update(&id, command).await {
        Ok(result) => {
            let response = CertificateMapper::to_update_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update certificate {}: {}", id, e);
            ApiError::from_domain(e, state.environment).into_response()
        }
    }
}

/// Revoke a certificate
pub async fn delete_certificate(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("DELETE /api/certificates/{}", id);

    match state.certificate_service.delete(&id).await {
        Ok(result) => {
            let response = CertificateMapper::to_delete_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete certificate {}: {}", id, e);
            ApiError::from_domain(e, state.environment).into_response()
        }
    }
}
