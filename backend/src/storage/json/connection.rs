use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const CERTIFICATES_FILE: &str = "certificates.json";

/// JsonConnection owns the location of the certificates document and the
/// lock that serializes read-modify-write cycles against it.
#[derive(Clone)]
pub struct JsonConnection {
    data_directory: PathBuf,
    backup_on_write: bool,
    write_lock: Arc<Mutex<()>>,
}

impl JsonConnection {
    /// Create a connection rooted at `data_directory`, creating the directory
    /// and an empty document if they don't exist yet.
    pub fn new<P: AsRef<Path>>(data_directory: P, backup_on_write: bool) -> Result<Self> {
        let data_directory = data_directory.as_ref().to_path_buf();

        if !data_directory.exists() {
            std::fs::create_dir_all(&data_directory).with_context(|| {
                format!("creating data directory {}", data_directory.display())
            })?;
            info!(path = %data_directory.display(), "Created data directory");
        }

        let connection = Self {
            data_directory,
            backup_on_write,
            write_lock: Arc::new(Mutex::new(())),
        };
        connection.ensure_certificates_file_exists()?;

        Ok(connection)
    }

    /// Path of the certificates document
    pub fn certificates_file_path(&self) -> PathBuf {
        self.data_directory.join(CERTIFICATES_FILE)
    }

    /// Path of the copy taken before each overwrite in production
    pub fn backup_file_path(&self) -> PathBuf {
        self.data_directory.join(format!("{}.backup", CERTIFICATES_FILE))
    }

    pub fn backup_on_write(&self) -> bool {
        self.backup_on_write
    }

    /// Hold this guard for the whole read-modify-write cycle
    pub async fn lock_for_write(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    fn ensure_certificates_file_exists(&self) -> Result<()> {
        let file_path = self.certificates_file_path();

        if !file_path.exists() {
            std::fs::write(&file_path, "[]\n")
                .with_context(|| format!("seeding {}", file_path.display()))?;
            debug!(path = %file_path.display(), "Seeded empty certificates file");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_directory_and_seed_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("nested").join("data");

        let connection = JsonConnection::new(&data_dir, false).unwrap();

        assert!(data_dir.is_dir());
        let content = std::fs::read_to_string(connection.certificates_file_path()).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn test_new_keeps_existing_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join(CERTIFICATES_FILE);
        std::fs::write(&file_path, "[{\"id\":1}]").unwrap();

        JsonConnection::new(temp_dir.path(), true).unwrap();

        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "[{\"id\":1}]");
    }

    #[test]
    fn test_backup_path_sits_next_to_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let connection = JsonConnection::new(temp_dir.path(), true).unwrap();

        assert_eq!(
            connection.backup_file_path(),
            temp_dir.path().join("certificates.json.backup")
        );
        assert!(connection.backup_on_write());
    }
}
