use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::{Config, RuleFile};

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        debug!(path = %path.display(), "loading configuration");

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        Self::from_yaml(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document is a config with every section defaulted.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(yaml).context("failed to parse YAML configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.filter.event_log_size == 0 {
            anyhow::bail!("filter.event_log_size must be at least 1");
        }

        Ok(())
    }

    /// Location of the keyword rules, if configured.
    ///
    /// Blank paths count as unset. Relative paths are resolved against the
    /// directory holding `config_path`.
    pub fn rule_source(&self, config_path: &Path) -> Option<PathBuf> {
        let file = self.filter.file.as_ref()?;
        if file.as_os_str().is_empty() || file.to_string_lossy().trim().is_empty() {
            return None;
        }

        if file.is_absolute() {
            return Some(file.clone());
        }

        let base = config_path.parent().unwrap_or_else(|| Path::new(""));
        Some(base.join(file))
    }
}

impl RuleFile {
    /// Parse a keyword rule source from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse keyword rules")
    }
}
