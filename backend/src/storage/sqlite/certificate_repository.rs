use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::info;

use super::connection::DbConnection;
use crate::domain::models::{CertificatePatch, DomainCertificate};
use crate::storage::{CertificateStorage, EditableCertificateStorage};

/// Repository for certificate rows
#[derive(Clone)]
pub struct CertificateRepository {
    db: DbConnection,
}

impl CertificateRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.db
            .pool()
            .ok_or_else(|| anyhow!("database connection is not available"))
    }

    fn from_row(row: &SqliteRow) -> DomainCertificate {
        DomainCertificate {
            id: row.get("id"),
            student_name: row.get("student_name"),
            course_name: row.get("course_name"),
            date: row.get("date"),
            qr_label: row
                .get::<Option<String>, _>("qr_label")
                .unwrap_or_default(),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl CertificateStorage for CertificateRepository {
    async fn list_certificates(&self) -> Result<Vec<DomainCertificate>> {
        let rows = sqlx::query(
            r#"
            SELECT id, student_name, course_name, date, qr_label, created_at, updated_at
            FROM certificates
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool()?)
        .await?;

        Ok(rows.iter().map(Self::from_row).collect())
    }

    async fn store_certificate(&self, certificate: &DomainCertificate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO certificates (id, student_name, course_name, date, qr_label, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(certificate.id)
        .bind(&certificate.student_name)
        .bind(&certificate.course_name)
        .bind(&certificate.date)
        .bind(&certificate.qr_label)
        .bind(&certificate.created_at)
        .bind(&certificate.updated_at)
        .execute(self.pool()?)
        .await?;

        info!(id = certificate.id, student = %certificate.student_name, "DB: certificate added");
        Ok(())
    }

    async fn delete_certificate(&self, id: i64) -> Result<Option<DomainCertificate>> {
        let row = sqlx::query(
            r#"
            DELETE FROM certificates
            WHERE id = ?
            RETURNING id, student_name, course_name, date, qr_label, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool()?)
        .await?;

        let deleted = row.as_ref().map(Self::from_row);
        if deleted.is_some() {
            info!(id, "DB: certificate deleted");
        }
        Ok(deleted)
    }
}

#[async_trait]
impl EditableCertificateStorage for CertificateRepository {
    async fn update_certificate(
        &self,
        id: i64,
        patch: &CertificatePatch,
    ) -> Result<Option<DomainCertificate>> {
        let row = sqlx::query(
            r#"
            UPDATE certificates
            SET student_name = COALESCE(?, student_name),
                course_name = COALESCE(?, course_name),
                date = COALESCE(?, date),
                qr_label = COALESCE(?, qr_label),
                updated_at = ?
            WHERE id = ?
            RETURNING id, student_name, course_name, date, qr_label, created_at, updated_at
            "#,
        )
        .bind(&patch.student_name)
        .bind(&patch.course_name)
        .bind(&patch.date)
        .bind(&patch.qr_label)
        .bind(&patch.updated_at)
        .bind(id)
        .fetch_optional(self.pool()?)
        .await?;

        let updated = row.as_ref().map(Self::from_row);
        if updated.is_some() {
            info!(id, "DB: certificate updated");
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn certificate(id: i64, created_at: &str) -> DomainCertificate {
        DomainCertificate {
            id,
            student_name: format!("Student {}", id),
            course_name: "Rust".to_string(),
            date: "2025-01-01".to_string(),
            qr_label: DomainCertificate::default_qr_label(id),
            created_at: created_at.to_string(),
            updated_at: None,
        }
    }

    async fn setup() -> (TempDir, CertificateRepository) {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = DbConnection::init_test(temp_dir.path())
            .await
            .expect("Failed to init test DB");
        (temp_dir, CertificateRepository::new(db))
    }

    #[tokio::test]
    async fn test_list_orders_by_creation_descending() {
        let (_temp_dir, repository) = setup().await;
        repository
            .store_certificate(&certificate(1, "2025-01-01T10:00:00.000Z"))
            .await
            .unwrap();
        repository
            .store_certificate(&certificate(3, "2025-01-03T10:00:00.000Z"))
            .await
            .unwrap();
        repository
            .store_certificate(&certificate(2, "2025-01-02T10:00:00.000Z"))
            .await
            .unwrap();

        let ids: Vec<i64> = repository
            .list_certificates()
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let (_temp_dir, repository) = setup().await;
        let original = certificate(42, "2025-01-01T10:00:00.123Z");
        repository.store_certificate(&original).await.unwrap();

        let listed = repository.list_certificates().await.unwrap();
        assert_eq!(listed, vec![original]);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let (_temp_dir, repository) = setup().await;
        let original = certificate(7, "2025-01-01T10:00:00.000Z");
        repository.store_certificate(&original).await.unwrap();

        assert!(repository.store_certificate(&original).await.is_err());
    }

    #[tokio::test]
    async fn test_update_applies_only_patched_fields() {
        let (_temp_dir, repository) = setup().await;
        repository
            .store_certificate(&certificate(5, "2025-01-01T10:00:00.000Z"))
            .await
            .unwrap();

        let patch = CertificatePatch {
            student_name: None,
            course_name: Some("Go".to_string()),
            date: None,
            qr_label: Some("".to_string()),
            updated_at: "2025-02-01T00:00:00.000Z".to_string(),
        };
        let updated = repository.update_certificate(5, &patch).await.unwrap().unwrap();

        assert_eq!(updated.student_name, "Student 5");
        assert_eq!(updated.course_name, "Go");
        assert_eq!(updated.qr_label, "");
        assert_eq!(updated.created_at, "2025-01-01T10:00:00.000Z");
        assert_eq!(updated.updated_at.as_deref(), Some("2025-02-01T00:00:00.000Z"));
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let (_temp_dir, repository) = setup().await;
        let patch = CertificatePatch {
            student_name: Some("X".to_string()),
            course_name: None,
            date: None,
            qr_label: None,
            updated_at: "2025-02-01T00:00:00.000Z".to_string(),
        };

        assert!(repository.update_certificate(999, &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_row_once() {
        let (_temp_dir, repository) = setup().await;
        repository
            .store_certificate(&certificate(9, "2025-01-01T10:00:00.000Z"))
            .await
            .unwrap();

        let deleted = repository.delete_certificate(9).await.unwrap();
        assert_eq!(deleted.map(|c| c.id), Some(9));
        assert!(repository.delete_certificate(9).await.unwrap().is_none());
        assert!(repository.list_certificates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_operations_fail_without_pool() {
        let repository = CertificateRepository::new(DbConnection::disconnected());
        assert!(repository.list_certificates().await.is_err());
    }
}
