use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::storage::LivenessProbe;

const MAX_CONNECTIONS: u32 = 5;

/// Readiness of the database connection.
///
/// Only `Connected` routes operations to the database; every other state
/// sends them to the file backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connected = 1,
    Connecting = 2,
    Disconnecting = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connected,
            2 => ConnectionState::Connecting,
            3 => ConnectionState::Disconnecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// DbConnection manages the pool and tracks whether it is usable
#[derive(Clone)]
pub struct DbConnection {
    pool: Option<Arc<SqlitePool>>,
    state: Arc<AtomicU8>,
}

impl DbConnection {
    /// Connect to `url`, creating the database file if needed
    pub async fn new(url: &str) -> Result<Self> {
        Self::connect(url, Duration::from_secs(10)).await
    }

    /// Connect with an explicit timeout for establishing the pool
    pub async fn connect(url: &str, connect_timeout: Duration) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url {}", url))?
            .create_if_missing(true);

        let pool = tokio::time::timeout(
            connect_timeout,
            SqlitePoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .acquire_timeout(connect_timeout)
                .connect_with(options),
        )
        .await
        .map_err(|_| anyhow!("timed out connecting to database after {:?}", connect_timeout))??;

        let connection = Self {
            pool: Some(Arc::new(pool)),
            state: Arc::new(AtomicU8::new(ConnectionState::Connecting as u8)),
        };
        if let Some(pool) = connection.pool() {
            Self::setup_schema(pool).await?;
        }
        connection.mark_connected();

        Ok(connection)
    }

    /// A connection that never went up; every operation uses the file backend
    pub fn disconnected() -> Self {
        Self {
            pool: None,
            state: Arc::new(AtomicU8::new(ConnectionState::Disconnected as u8)),
        }
    }

    /// Best-effort startup connect. Failures are logged and yield a
    /// disconnected handle instead of aborting the process.
    pub async fn connect_or_disconnected(url: Option<&str>, connect_timeout: Duration) -> Self {
        let Some(url) = url else {
            warn!("DATABASE_URL not set, certificates will be stored in the local file");
            return Self::disconnected();
        };

        match Self::connect(url, connect_timeout).await {
            Ok(connection) => {
                info!(url, "Database connected");
                connection
            }
            Err(e) => {
                error!(error = %e, "Database connection failed, using file storage");
                Self::disconnected()
            }
        }
    }

    pub fn pool(&self) -> Option<&SqlitePool> {
        self.pool.as_deref()
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// True while the connection is ready and the pool still open
    pub fn is_connected(&self) -> bool {
        match &self.pool {
            Some(pool) => self.state() == ConnectionState::Connected && !pool.is_closed(),
            None => false,
        }
    }

    pub fn mark_connected(&self) {
        if self.pool.is_some() {
            self.transition(ConnectionState::Connected);
        }
    }

    pub fn mark_disconnected(&self) {
        self.transition(ConnectionState::Disconnected);
    }

    fn transition(&self, next: ConnectionState) {
        let previous = ConnectionState::from_u8(self.state.swap(next as u8, Ordering::AcqRel));
        if previous != next {
            info!(?previous, ?next, "Database connection state changed");
        }
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<()> {
        let pool = self.pool().ok_or_else(|| anyhow!("database was never connected"))?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool; the connection stays disconnected afterwards
    pub async fn close(&self) {
        self.transition(ConnectionState::Disconnecting);
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
        self.transition(ConnectionState::Disconnected);
    }

    /// Periodically ping the database and keep the readiness state in sync.
    /// Returns `None` when there is no pool to watch or the interval is zero.
    pub fn spawn_health_monitor(&self, interval: Duration) -> Option<JoinHandle<()>> {
        self.pool.as_ref()?;
        if interval.is_zero() {
            warn!("Database health interval is zero, health monitor not started");
            return None;
        }
        let connection = self.clone();

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;

                if connection.pool().map_or(true, |pool| pool.is_closed()) {
                    connection.mark_disconnected();
                    break;
                }

                if connection.state() == ConnectionState::Disconnected {
                    connection.transition(ConnectionState::Connecting);
                }

                match connection.ping().await {
                    Ok(()) => connection.mark_connected(),
                    Err(e) => {
                        warn!(error = %e, "Database ping failed");
                        connection.mark_disconnected();
                    }
                }
            }
        }))
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS certificates (
                row_id INTEGER PRIMARY KEY AUTOINCREMENT,
                id INTEGER NOT NULL UNIQUE,
                student_name TEXT NOT NULL,
                course_name TEXT NOT NULL,
                date TEXT NOT NULL,
                qr_label TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Listing is always newest first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_certificates_created_at
            ON certificates(created_at DESC);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Fresh database file inside a temp directory
    #[cfg(test)]
    pub async fn init_test(dir: &std::path::Path) -> Result<Self> {
        let url = format!("sqlite://{}", dir.join("certificates.db").display());
        Self::new(&url).await
    }
}

#[async_trait]
impl LivenessProbe for DbConnection {
    async fn is_live(&self) -> bool {
        self.is_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_database_and_reports_live() {
        let temp_dir = tempfile::tempdir().unwrap();
        let connection = DbConnection::init_test(temp_dir.path()).await.unwrap();

        assert!(temp_dir.path().join("certificates.db").exists());
        assert_eq!(connection.state(), ConnectionState::Connected);
        assert!(connection.is_live().await);
        connection.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_disconnected_handle_is_never_live() {
        let connection = DbConnection::disconnected();

        assert!(!connection.is_live().await);
        assert!(connection.ping().await.is_err());
        // Cannot be forced up without a pool
        connection.mark_connected();
        assert!(!connection.is_connected());
    }

    #[tokio::test]
    async fn test_missing_url_falls_back() {
        let connection = DbConnection::connect_or_disconnected(None, Duration::from_secs(1)).await;
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_unreachable_database_falls_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", temp_dir.path().join("missing").join("db.sqlite").display());

        let connection =
            DbConnection::connect_or_disconnected(Some(&url), Duration::from_secs(2)).await;
        assert!(!connection.is_connected());
    }

    #[tokio::test]
    async fn test_health_monitor_requires_pool_and_period() {
        assert!(DbConnection::disconnected()
            .spawn_health_monitor(Duration::from_secs(1))
            .is_none());

        let temp_dir = tempfile::tempdir().unwrap();
        let connection = DbConnection::init_test(temp_dir.path()).await.unwrap();
        assert!(connection.spawn_health_monitor(Duration::ZERO).is_none());

        let handle = connection
            .spawn_health_monitor(Duration::from_millis(10))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        assert!(connection.is_connected());
        handle.abort();
    }

    #[tokio::test]
    async fn test_health_monitor_notices_closed_pool() {
        let temp_dir = tempfile::tempdir().unwrap();
        let connection = DbConnection::init_test(temp_dir.path()).await.unwrap();
        let handle = connection
            .spawn_health_monitor(Duration::from_millis(10))
            .unwrap();

        connection.close().await;
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_only_connected_state_is_live() {
        let temp_dir = tempfile::tempdir().unwrap();
        let connection = DbConnection::init_test(temp_dir.path()).await.unwrap();

        for state in [ConnectionState::Connecting, ConnectionState::Disconnecting] {
            connection.transition(state);
            assert_eq!(connection.state(), state);
            assert!(!connection.is_live().await);
        }
    }

    #[tokio::test]
    async fn test_health_monitor_recovers_disconnected_state() {
        let temp_dir = tempfile::tempdir().unwrap();
        let connection = DbConnection::init_test(temp_dir.path()).await.unwrap();
        connection.mark_disconnected();

        let handle = connection
            .spawn_health_monitor(Duration::from_millis(10))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(connection.state(), ConnectionState::Connected);
        handle.abort();
    }

    #[tokio::test]
    async fn test_state_flips_are_visible_to_probe() {
        let temp_dir = tempfile::tempdir().unwrap();
        let connection = DbConnection::init_test(temp_dir.path()).await.unwrap();

        connection.mark_disconnected();
        assert!(!connection.is_live().await);

        connection.mark_connected();
        assert!(connection.is_live().await);

        connection.close().await;
        assert!(!connection.is_live().await);
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }
}
