//! Error taxonomy shared by every certificate operation.

/// Failures reported by the certificate store.
///
/// Validation and identifier errors are raised before any backend is touched.
/// `Read` is non-fatal: listing degrades to an empty result and carries it
/// alongside for logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CertificateError {
    #[error("Missing or empty required fields: {}", .fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    #[error("Invalid certificate id format: {0:?}")]
    InvalidId(String),

    #[error("Certificate not found: {0}")]
    NotFound(i64),

    #[error("{operation} is disabled while running on file storage")]
    UnsupportedOperation { operation: &'static str },

    #[error("Failed to persist certificate: {0}")]
    Persistence(String),

    #[error("Failed to read certificates: {0}")]
    Read(String),
}

impl CertificateError {
    pub fn persistence(error: anyhow::Error) -> Self {
        Self::Persistence(format!("{:#}", error))
    }

    pub fn read(error: anyhow::Error) -> Self {
        Self::Read(format!("{:#}", error))
    }
}
