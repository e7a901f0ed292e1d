//! Rebuilding the rule table from configuration.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::FilterError;
use super::rule::RuleTable;
use crate::config::Config;

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadReport {
    /// File the rules were read from
    pub source: PathBuf,
    /// Number of keyword rules now active
    pub rules: usize,
}

/// Reads the main config, follows `filter.file`, and builds a fresh table.
///
/// Never touches the live table; the engine swaps the result in.
#[derive(Debug, Clone)]
pub struct ReloadController {
    config_path: PathBuf,
}

impl ReloadController {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Main config file this controller reads.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Read the main config and return the rule source location.
    pub fn resolve_source(&self) -> Result<PathBuf, FilterError> {
        let config = Config::load(&self.config_path)
            .map_err(|e| FilterError::unreadable(&self.config_path, format!("{:#}", e)))?;

        config
            .rule_source(&self.config_path)
            .ok_or(FilterError::ConfigMissing)
    }

    /// Build a new table from the current on-disk configuration.
    pub fn build(&self) -> Result<RuleTable, FilterError> {
        let source = self.resolve_source()?;
        debug!(
            config = %self.config_path.display(),
            source = %source.display(),
            "building rule table"
        );
        RuleTable::load(&source)
    }

    /// Files whose changes should trigger a reload.
    ///
    /// The rule source is included only if it can currently be resolved.
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.config_path.clone()];
        if let Ok(source) = self.resolve_source() {
            if source != self.config_path {
                paths.push(source);
            }
        }
        paths
    }
}
