//! Console configuration (env-driven).

use std::time::Duration;

use anyhow::{Context, Result};

/// Console configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cluster manager base URL (example: http://127.0.0.1:5000).
    pub api_url: String,

    /// Interval between periodic refreshes in watch mode.
    pub poll_interval: Duration,

    /// How long a notification stays visible before expiring.
    pub notification_ttl: Duration,

    /// Render a single refresh and exit instead of watching.
    pub once: bool,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_url =
            std::env::var("FLEET_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());

        let poll_interval_ms: u64 = std::env::var("FLEET_POLL_INTERVAL_MS")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("FLEET_POLL_INTERVAL_MS must be an integer (milliseconds).")?
            .unwrap_or(5000);
        let poll_interval = Duration::from_millis(poll_interval_ms.max(100));

        let notification_ttl_ms: u64 = std::env::var("FLEET_NOTIFICATION_TTL_MS")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("FLEET_NOTIFICATION_TTL_MS must be an integer (milliseconds).")?
            .unwrap_or(5000);
        let notification_ttl = Duration::from_millis(notification_ttl_ms.max(100));

        let once = std::env::var("FLEET_WATCH_ONCE")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let log_level = std::env::var("FLEET_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_url,
            poll_interval,
            notification_ttl,
            once,
            log_level,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".to_string(),
            poll_interval: Duration::from_millis(5000),
            notification_ttl: Duration::from_millis(5000),
            once: false,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.poll_interval, Duration::from_millis(5000));
        assert_eq!(config.notification_ttl, Duration::from_millis(5000));
        assert!(!config.once);
    }
}
