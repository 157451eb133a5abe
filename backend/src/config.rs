//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally pre-populated from a
//! `.env` file by the binary before [`Config::from_env`] runs.

use anyhow::{ensure, Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 30;
/// Free hosting tiers sleep after 15 idle minutes
const DEFAULT_KEEP_ALIVE_INTERVAL_SECS: u64 = 14 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveConfig {
    /// Base URL of this deployment; `/api/health` is appended
    pub target_url: String,
    pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    /// Absent means the service runs on the file backend only
    pub database_url: Option<String>,
    pub database_connect_timeout: Duration,
    pub database_health_interval: Duration,
    pub data_dir: PathBuf,
    pub keep_alive: Option<KeepAliveConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", value))?,
            None => DEFAULT_PORT,
        };

        let environment = non_empty("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);

        let seconds = |key: &str, default: u64| -> Result<Duration> {
            match non_empty(key) {
                Some(value) => {
                    let secs = value.trim().parse::<u64>().with_context(|| {
                        format!("{} must be a number of seconds, got {:?}", key, value)
                    })?;
                    ensure!(secs > 0, "{} must be at least one second", key);
                    Ok(Duration::from_secs(secs))
                }
                None => Ok(Duration::from_secs(default)),
            }
        };

        let database_connect_timeout =
            seconds("DATABASE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let database_health_interval =
            seconds("DATABASE_HEALTH_INTERVAL_SECS", DEFAULT_HEALTH_INTERVAL_SECS)?;
        let keep_alive_interval =
            seconds("KEEP_ALIVE_INTERVAL_SECS", DEFAULT_KEEP_ALIVE_INTERVAL_SECS)?;

        let keep_alive = non_empty("RENDER_EXTERNAL_URL")
            .or_else(|| non_empty("KEEP_ALIVE_URL"))
            .map(|url| KeepAliveConfig {
                target_url: url.trim().trim_end_matches('/').to_string(),
                interval: keep_alive_interval,
            });

        Ok(Self {
            port,
            environment,
            database_url: non_empty("DATABASE_URL"),
            database_connect_timeout,
            database_health_interval,
            data_dir: non_empty("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            keep_alive,
        })
    }
}
