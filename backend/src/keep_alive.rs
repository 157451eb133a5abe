//! Periodic self-ping that keeps a free-tier host from putting the service to
//! sleep. Failures are logged and the loop carries on.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{error, info};

use crate::config::KeepAliveConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// URL the keep-alive task requests
pub fn health_url(target_url: &str) -> String {
    format!("{}/api/health", target_url.trim_end_matches('/'))
}

/// Start pinging `{target}/api/health` every `interval`; the first ping
/// happens one interval after startup.
pub fn spawn_keep_alive(config: KeepAliveConfig) -> anyhow::Result<JoinHandle<()>> {
    anyhow::ensure!(!config.interval.is_zero(), "keep-alive interval must be non-zero");
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let url = health_url(&config.target_url);

    info!(target = %url, interval_secs = config.interval.as_secs(), "Keep-alive started");

    Ok(tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
        loop {
            ticker.tick().await;
            info!("ping...");
            match client.get(&url).send().await {
                Ok(response) => info!(status = response.status().as_u16(), "pong!"),
                Err(e) => error!(error = %e, "Keep-alive request failed"),
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_url_strips_trailing_slash() {
        assert_eq!(
            health_url("https://academy.example.com/"),
            "https://academy.example.com/api/health"
        );
        assert_eq!(
            health_url("http://localhost:3001"),
            "http://localhost:3001/api/health"
        );
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let result = spawn_keep_alive(KeepAliveConfig {
            target_url: "http://127.0.0.1:9".to_string(),
            interval: Duration::ZERO,
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_target_does_not_stop_the_loop() {
        let handle = spawn_keep_alive(KeepAliveConfig {
            target_url: "http://127.0.0.1:9".to_string(),
            interval: Duration::from_millis(20),
        })
        .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
