//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::config::CliConfig;
use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["sitekit.toml", ".sitekit.toml", "sitekit.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            find_config(&cwd).unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Site source directory.
    pub fn source_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.site.source)
    }

    /// Site output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.site.output)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<CliConfig> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                    return Some(config);
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_in_parent() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join("sitekit.toml"),
            "[site]\ntitle = \"Parent\"\n",
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = find_config(&nested).unwrap();
        assert_eq!(config.site.title, "Parent");
    }

    #[test]
    fn test_resolve_paths() {
        let ctx = Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: PathBuf::from("/work/site"),
        };

        assert_eq!(ctx.source_dir(), PathBuf::from("/work/site/content"));
        assert_eq!(ctx.output_dir(), PathBuf::from("/work/site/public"));
        assert_eq!(ctx.resolve_path("/abs/out"), PathBuf::from("/abs/out"));
    }
}
