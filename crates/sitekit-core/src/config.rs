//! Timing and reload configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What happens when a step that is already running is started again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartPolicy {
    /// Discard the running measurement and start over.
    #[default]
    Restart,
    /// Keep the running measurement and report a sequencing error.
    Reject,
}

/// Configuration for the build step timer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Behaviour of `start` on an active step.
    #[serde(default)]
    pub restart_policy: RestartPolicy,
}

/// Configuration for the live-reload watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadConfig {
    /// Base URL of the development server.
    #[serde(default = "default_url")]
    pub url: String,

    /// Path of the ping endpoint that returns the content token.
    #[serde(default = "default_ping_path")]
    pub ping_path: String,

    /// Interval between probes (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Delay between detecting a change and reloading (milliseconds).
    #[serde(default = "default_grace_delay_ms")]
    pub grace_delay_ms: u64,

    /// Timeout for a single probe request (milliseconds).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_ping_path() -> String {
    "/__sitekit/ping".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_grace_delay_ms() -> u64 {
    3000
}

fn default_request_timeout_ms() -> u64 {
    1000
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            ping_path: default_ping_path(),
            poll_interval_ms: default_poll_interval_ms(),
            grace_delay_ms: default_grace_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ReloadConfig {
    /// Create a config pointing at the given server.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Full URL of the ping endpoint.
    pub fn ping_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        if self.ping_path.starts_with('/') {
            format!("{}{}", base, self.ping_path)
        } else {
            format!("{}/{}", base, self.ping_path)
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.grace_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_defaults() {
        let config = ReloadConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.grace_delay(), Duration::from_millis(3000));
        assert_eq!(config.ping_url(), "http://127.0.0.1:8000/__sitekit/ping");
    }

    #[test]
    fn test_ping_url_joins_slashes() {
        let mut config = ReloadConfig::new("http://localhost:3000/");
        assert_eq!(config.ping_url(), "http://localhost:3000/__sitekit/ping");

        config.ping_path = "ping".to_string();
        assert_eq!(config.ping_url(), "http://localhost:3000/ping");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ReloadConfig = toml::from_str("poll_interval_ms = 250").unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.grace_delay_ms, 3000);
        assert_eq!(config.ping_path, "/__sitekit/ping");
    }

    #[test]
    fn test_restart_policy_serde() {
        let config: TimingConfig = toml::from_str(r#"restart_policy = "reject""#).unwrap();
        assert_eq!(config.restart_policy, RestartPolicy::Reject);

        let json = serde_json::to_string(&TimingConfig::default()).unwrap();
        assert_eq!(json, r#"{"restart_policy":"restart"}"#);
    }
}
