//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sitekit_core::{ReloadConfig, TimingConfig};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Site metadata and directories.
    #[serde(default)]
    pub site: SiteConfig,

    /// Step timer configuration.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Live-reload configuration.
    #[serde(default)]
    pub reload: ReloadConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Site metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, shown in the build report.
    #[serde(default = "default_title")]
    pub title: String,

    /// Source directory (relative to the working directory).
    #[serde(default = "default_source")]
    pub source: String,

    /// Output directory (relative to the working directory).
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_source() -> String {
    "content".to_string()
}

fn default_output() -> String {
    "public".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            source: default_source(),
            output: default_output(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_core::RestartPolicy;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_toml() {
        let file = write_temp(
            ".toml",
            r#"
[site]
title = "Field Notes"
output = "dist"

[timing]
restart_policy = "reject"

[reload]
url = "http://localhost:4000"
grace_delay_ms = 1500
"#,
        );

        let config = CliConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.site.title, "Field Notes");
        assert_eq!(config.site.source, "content");
        assert_eq!(config.site.output, "dist");
        assert_eq!(config.timing.restart_policy, RestartPolicy::Reject);
        assert_eq!(config.reload.url, "http://localhost:4000");
        assert_eq!(config.reload.grace_delay_ms, 1500);
        assert_eq!(config.reload.poll_interval_ms, 1000);
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(".json", r#"{"site": {"title": "Docs"}}"#);

        let config = CliConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.site.title, "Docs");
        assert_eq!(config.timing.restart_policy, RestartPolicy::Restart);
    }

    #[test]
    fn test_load_invalid_reports_path() {
        let file = write_temp(".toml", "site = 3");
        let path = file.path().to_str().unwrap().to_string();

        let err = CliConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains(&path));
    }

    #[test]
    fn test_missing_file() {
        assert!(CliConfig::load("/nonexistent/sitekit.toml").is_err());
    }
}
