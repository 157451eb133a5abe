//! Certificate service: the single entry point the REST layer talks to.
//!
//! Each operation starts by probing the database connection and picks a
//! backend for that call only:
//!
//! - live database → [`StorageMode::Connected`], the SQLite backend
//! - anything else → [`StorageMode::Fallback`], the JSON file backend
//!
//! Nothing is cached between calls, so records written in one mode are not
//! visible from the other. Mode changes between consecutive operations are
//! logged so a flapping connection shows up in the logs.
//!
//! Editing is only available in connected mode. In fallback mode `update`
//! fails with [`CertificateError::UnsupportedOperation`] whatever the payload.

use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use crate::domain::commands::certificates::{
    CertificateListResult, CreateCertificateCommand, CreateCertificateResult,
    DeleteCertificateResult, UpdateCertificateCommand, UpdateCertificateResult,
};
use crate::domain::error::CertificateError;
use crate::domain::id_generator::IdGenerator;
use crate::domain::models::{DomainCertificate, StorageMode};
use crate::storage::{
    CertificateStorage, DbConnection, EditableCertificateStorage, JsonCertificateRepository,
    JsonConnection, LivenessProbe, SqliteCertificateRepository,
};

#[derive(Clone)]
pub struct CertificateService {
    database: Arc<dyn EditableCertificateStorage>,
    probe: Arc<dyn LivenessProbe>,
    file: Arc<dyn CertificateStorage>,
    ids: Arc<IdGenerator>,
    last_mode: Arc<Mutex<Option<StorageMode>>>,
}

impl CertificateService {
    pub fn new(
        database: Arc<dyn EditableCertificateStorage>,
        probe: Arc<dyn LivenessProbe>,
        file: Arc<dyn CertificateStorage>,
    ) -> Self {
        Self {
            database,
            probe,
            file,
            ids: Arc::new(IdGenerator::new()),
            last_mode: Arc::new(Mutex::new(None)),
        }
    }

    /// Wire the SQLite and JSON backends, using the database connection as
    /// the liveness probe
    pub fn from_connections(db: DbConnection, json: JsonConnection) -> Self {
        let database = Arc::new(SqliteCertificateRepository::new(db.clone()));
        let file = Arc::new(JsonCertificateRepository::new(json));
        Self::new(database, Arc::new(db), file)
    }

    /// Seed the id generator with the largest id already stored anywhere.
    /// Unreadable backends are skipped.
    pub async fn prime_identifiers(&self) {
        let mut highest = None;

        if self.probe.is_live().await {
            match self.database.list_certificates().await {
                Ok(certificates) => highest = certificates.iter().map(|c| c.id).max(),
                Err(e) => warn!(error = %e, "Could not read database ids at startup"),
            }
        }
        if let Ok(certificates) = self.file.list_certificates().await {
            highest = highest.max(certificates.iter().map(|c| c.id).max());
        }

        if let Some(id) = highest {
            self.ids.observe(id);
            debug!(id, "Primed certificate id generator");
        }
    }

    /// Probe the database and report which backend would serve a call now
    pub async fn current_mode(&self) -> StorageMode {
        self.select_mode().await
    }

    /// List all certificates, newest first.
    ///
    /// Never fails: a read error yields an empty list with the error attached.
    pub async fn list(&self) -> CertificateListResult {
        let mode = self.select_mode().await;

        let result = match mode {
            StorageMode::Connected => self.database.list_certificates().await,
            StorageMode::Fallback => self.file.list_certificates().await,
        };

        match result {
            Ok(certificates) => CertificateListResult {
                certificates,
                mode,
                read_error: None,
            },
            Err(e) => {
                let read_error = CertificateError::read(e);
                error!(%mode, error = %read_error, "Listing certificates failed, returning empty list");
                CertificateListResult {
                    certificates: Vec::new(),
                    mode,
                    read_error: Some(read_error),
                }
            }
        }
    }

    pub async fn create(
        &self,
        command: CreateCertificateCommand,
    ) -> Result<CreateCertificateResult, CertificateError> {
        let certificate = DomainCertificate::normalize_for_create(command, &self.ids)?;
        let mode = self.select_mode().await;

        let result = match mode {
            StorageMode::Connected => self.database.store_certificate(&certificate).await,
            StorageMode::Fallback => self.file.store_certificate(&certificate).await,
        };
        result.map_err(CertificateError::persistence)?;

        info!(id = certificate.id, %mode, "Certificate created");
        Ok(CreateCertificateResult {
            certificate,
            mode,
            success_message: format!("Certificate added successfully ({})", mode.backend_label()),
        })
    }

    pub async fn delete(&self, raw_id: &str) -> Result<DeleteCertificateResult, CertificateError> {
        let id = parse_id(raw_id)?;
        let mode = self.select_mode().await;

        let result = match mode {
            StorageMode::Connected => self.database.delete_certificate(id).await,
            StorageMode::Fallback => self.file.delete_certificate(id).await,
        };
        let deleted = result
            .map_err(CertificateError::persistence)?
            .ok_or(CertificateError::NotFound(id))?;

        Ok(DeleteCertificateResult {
            id,
            deleted,
            mode,
            success_message: format!("Certificate deleted successfully ({})", mode.backend_label()),
        })
    }

    pub async fn update(
        &self,
        raw_id: &str,
        command: UpdateCertificateCommand,
    ) -> Result<UpdateCertificateResult, CertificateError> {
        let id = parse_id(raw_id)?;
        let mode = self.select_mode().await;

        if mode == StorageMode::Fallback {
            return Err(CertificateError::UnsupportedOperation {
                operation: "Editing certificates",
            });
        }

        let patch = DomainCertificate::normalize_for_update(command)?;
        let certificate = self
            .database
            .update_certificate(id, &patch)
            .await
            .map_err(CertificateError::persistence)?
            .ok_or(CertificateError::NotFound(id))?;

        Ok(UpdateCertificateResult {
            certificate,
            mode,
            success_message: format!("Certificate updated successfully ({})", mode.backend_label()),
        })
    }

    async fn select_mode(&self) -> StorageMode {
        let mode = if self.probe.is_live().await {
            StorageMode::Connected
        } else {
            StorageMode::Fallback
        };

        let previous = self
            .last_mode
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(mode);

        match previous {
            None => info!(%mode, "Storage mode selected"),
            Some(previous) if previous != mode => {
                warn!(from = %previous, to = %mode, "Storage mode changed")
            }
            Some(_) => {}
        }

        mode
    }
}

/// Certificate ids are 64-bit integers; anything else is rejected up front
fn parse_id(raw_id: &str) -> Result<i64, CertificateError> {
    raw_id
        .trim()
        .parse::<i64>()
        .map_err(|_| CertificateError::InvalidId(raw_id.to_string()))
}
