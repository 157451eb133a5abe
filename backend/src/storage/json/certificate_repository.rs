//! # JSON Certificate Repository
//!
//! File backend: the whole collection lives in one JSON document,
//! `{data_directory}/certificates.json`, kept newest-first.
//!
//! ```json
//! [
//!   {
//!     "id": 1736424000123,
//!     "studentName": "Ali Valiyev",
//!     "courseName": "Frontend",
//!     "date": "2025-01-09",
//!     "qrLabel": "ID: 1736424000123",
//!     "createdAt": "2025-01-09T12:00:00.123Z"
//!   }
//! ]
//! ```
//!
//! Every mutation reads the full document and rewrites it through a temp file
//! and an atomic rename. The connection's write lock serializes those cycles
//! within this process. Other processes writing the same file can still race
//! and the last writer wins.
//!
//! A missing or unparseable document reads as an empty collection. Entries
//! that don't parse as certificates are hidden from listings but kept on
//! every rewrite.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::connection::JsonConnection;
use crate::domain::models::DomainCertificate;
use crate::storage::CertificateStorage;

/// On-disk shape of a certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CertificateDocument {
    id: i64,
    student_name: String,
    course_name: String,
    date: String,
    #[serde(default)]
    qr_label: Option<String>,
    created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

impl From<DomainCertificate> for CertificateDocument {
    fn from(certificate: DomainCertificate) -> Self {
        CertificateDocument {
            id: certificate.id,
            student_name: certificate.student_name,
            course_name: certificate.course_name,
            date: certificate.date,
            qr_label: Some(certificate.qr_label),
            created_at: certificate.created_at,
            updated_at: certificate.updated_at,
        }
    }
}

impl From<CertificateDocument> for DomainCertificate {
    fn from(document: CertificateDocument) -> Self {
        let qr_label = document
            .qr_label
            .unwrap_or_else(|| DomainCertificate::default_qr_label(document.id));
        DomainCertificate {
            id: document.id,
            student_name: document.student_name,
            course_name: document.course_name,
            date: document.date,
            qr_label,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct CertificateRepository {
    connection: JsonConnection,
}

impl CertificateRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    /// Read the whole document. Never fails: anything unreadable is empty.
    pub async fn read_certificates(&self) -> Vec<DomainCertificate> {
        let mut certificates = Vec::new();
        for entry in self.read_entries().await {
            match serde_json::from_value::<CertificateDocument>(entry) {
                Ok(document) => certificates.push(document.into()),
                Err(e) => {
                    warn!(error = %e, "Failed to parse certificate record. Skipping.");
                    continue;
                }
            }
        }

        certificates
    }

    /// Raw entries of the document, including ones that don't parse as
    /// certificates. Rewrites keep those untouched.
    async fn read_entries(&self) -> Vec<Value> {
        let file_path = self.connection.certificates_file_path();

        let content = match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "Failed to read certificates file");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!(path = %file_path.display(), "Certificates file is not a list, treating as empty");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "Certificates file is not valid JSON, treating as empty");
                Vec::new()
            }
        }
    }

    /// Rewrite the whole document
    async fn write_entries(&self, entries: &[Value]) -> Result<()> {
        let file_path = self.connection.certificates_file_path();
        let temp_file_path = file_path.with_extension("json.tmp");

        if self.connection.backup_on_write() && file_path.exists() {
            let backup_path = self.connection.backup_file_path();
            if let Err(e) = tokio::fs::copy(&file_path, &backup_path).await {
                warn!(path = %backup_path.display(), error = %e, "Backup failed, continuing with write");
            }
        }

        let json = serde_json::to_string_pretty(entries)?;

        tokio::fs::write(&temp_file_path, json)
            .await
            .with_context(|| format!("writing {}", temp_file_path.display()))?;
        tokio::fs::rename(&temp_file_path, &file_path)
            .await
            .with_context(|| format!("replacing {}", file_path.display()))?;

        debug!(count = entries.len(), path = %file_path.display(), "Wrote certificates file");
        Ok(())
    }
}

#[async_trait]
impl CertificateStorage for CertificateRepository {
    async fn list_certificates(&self) -> Result<Vec<DomainCertificate>> {
        Ok(self.read_certificates().await)
    }

    async fn store_certificate(&self, certificate: &DomainCertificate) -> Result<()> {
        let _guard = self.connection.lock_for_write().await;

        let mut entries = self.read_entries().await;
        let document = CertificateDocument::from(certificate.clone());
        entries.insert(0, serde_json::to_value(document)?);
        self.write_entries(&entries).await?;

        info!(id = certificate.id, student = %certificate.student_name, "File: certificate added");
        Ok(())
    }

    async fn delete_certificate(&self, id: i64) -> Result<Option<DomainCertificate>> {
        let _guard = self.connection.lock_for_write().await;

        let mut entries = self.read_entries().await;
        let found = entries.iter().enumerate().find_map(|(position, entry)| {
            serde_json::from_value::<CertificateDocument>(entry.clone())
                .ok()
                .filter(|document| document.id == id)
                .map(|document| (position, DomainCertificate::from(document)))
        });
        let Some((position, removed)) = found else {
            return Ok(None);
        };

        entries.remove(position);
        self.write_entries(&entries).await?;

        info!(id, student = %removed.student_name, "File: certificate deleted");
        Ok(Some(removed))
    }
}
