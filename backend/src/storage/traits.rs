//! # Storage Traits
//!
//! Contracts the certificate service uses to talk to its backends, so the
//! database and file implementations (or test doubles) can be swapped freely.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{CertificatePatch, DomainCertificate};

/// Operations every certificate backend supports
#[async_trait]
pub trait CertificateStorage: Send + Sync {
    /// List all certificates, newest first
    async fn list_certificates(&self) -> Result<Vec<DomainCertificate>>;

    /// Persist a new certificate
    async fn store_certificate(&self, certificate: &DomainCertificate) -> Result<()>;

    /// Remove the certificate with the given external id.
    /// Returns the removed record, or `None` if no such record exists.
    async fn delete_certificate(&self, id: i64) -> Result<Option<DomainCertificate>>;
}

/// Backends that also support in-place edits.
///
/// Only the database backend implements this; editing is disabled in
/// file mode.
#[async_trait]
pub trait EditableCertificateStorage: CertificateStorage {
    /// Apply a patch and return the updated record, or `None` if absent
    async fn update_certificate(
        &self,
        id: i64,
        patch: &CertificatePatch,
    ) -> Result<Option<DomainCertificate>>;
}

/// Reports whether a backend connection is currently usable
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn is_live(&self) -> bool;
}
