//! Translation of domain failures into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;

use crate::config::Environment;
use crate::domain::CertificateError;
use crate::io::rest::body::BodyRejection;

/// An error ready to be sent back to the client
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    /// Map a domain error to a status code and envelope. Internal detail is
    /// only exposed in development.
    pub fn from_domain(error: CertificateError, environment: Environment) -> Self {
        let (status, body) = match &error {
            CertificateError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(error.to_string()))
            }
            CertificateError::InvalidId(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Invalid ID format"),
            ),
            CertificateError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Certificate not found"),
            ),
            CertificateError::UnsupportedOperation { .. } => {
                (StatusCode::NOT_IMPLEMENTED, ErrorResponse::new(error.to_string()))
            }
            CertificateError::Persistence(detail) | CertificateError::Read(detail) => {
                let body = ErrorResponse::new("Server error: certificate storage failed");
                let body = if environment.is_production() {
                    body
                } else {
                    body.with_message(detail.clone())
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        Self { status, body }
    }

    /// Request body was not usable JSON or form data
    pub fn invalid_body(rejection: BodyRejection, environment: Environment) -> Self {
        let body = ErrorResponse::new("Invalid request body");
        let body = if environment.is_production() {
            body
        } else {
            body.with_message(rejection.body_text())
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            body,
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                CertificateError::Validation { fields: vec!["date"] },
                StatusCode::BAD_REQUEST,
            ),
            (CertificateError::InvalidId("x".into()), StatusCode::BAD_REQUEST),
            (CertificateError::NotFound(1), StatusCode::NOT_FOUND),
            (
                CertificateError::UnsupportedOperation { operation: "Editing" },
                StatusCode::NOT_IMPLEMENTED,
            ),
            (
                CertificateError::Persistence("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from_domain(error, Environment::Development).status(), status);
        }
    }

    #[test]
    fn test_detail_hidden_in_production() {
        let error = CertificateError::Persistence("disk full".into());

        let production = ApiError::from_domain(error.clone(), Environment::Production);
        assert_eq!(production.body.message, None);
        assert!(!production.body.success);

        let development = ApiError::from_domain(error, Environment::Development);
        assert_eq!(development.body.message.as_deref(), Some("disk full"));
    }
}
