//! Keyword rules and the rule table.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use super::action::FilterAction;
use super::error::FilterError;
use super::matcher::GlobPattern;
use crate::config::{KeywordConfig, RuleFile};

/// A compiled keyword rule.
#[derive(Debug)]
pub struct FilterRule {
    pattern: GlobPattern,
    reason: String,
    action: FilterAction,
    hits: AtomicU64,
}

impl FilterRule {
    /// Build a rule from its parts.
    pub fn new(pattern: &str, reason: impl Into<String>, action: FilterAction) -> Self {
        Self {
            pattern: GlobPattern::new(pattern),
            reason: reason.into(),
            action,
            hits: AtomicU64::new(0),
        }
    }

    /// Compile a `keywords:` entry. `index` is only used in errors.
    pub fn from_config(index: usize, config: &KeywordConfig) -> Result<Self, FilterError> {
        let action = FilterAction::from_config(config.action.as_deref()).map_err(|e| {
            FilterError::InvalidRule {
                index,
                message: e.to_string(),
            }
        })?;

        let rule = Self::new(&config.pattern, config.reason.clone(), action);
        if !rule.pattern.is_valid() {
            warn!(
                index,
                pattern = %config.pattern,
                "keyword pattern could not be compiled and will never match"
            );
        }

        Ok(rule)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn action(&self) -> FilterAction {
        self.action
    }

    /// Test message text against this rule.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.matches(text)
    }

    /// Times this rule has fired.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }
}

/// Ordered keyword rules loaded from one source.
///
/// Built once and never changed; a reload builds a whole new table.
#[derive(Debug, Default)]
pub struct RuleTable {
    rules: Vec<FilterRule>,
    source: Option<PathBuf>,
}

impl RuleTable {
    /// Table with no source. Matches nothing.
    pub fn inert() -> Self {
        Self::default()
    }

    /// Table from rules built by the caller. `source` labels it in logs.
    pub fn from_rules(rules: Vec<FilterRule>, source: impl Into<PathBuf>) -> Self {
        Self {
            rules,
            source: Some(source.into()),
        }
    }

    /// Load keyword rules from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FilterError> {
        let path = path.as_ref();

        debug!(path = %path.display(), "loading keyword rules");

        let contents = fs::read_to_string(path).map_err(|e| FilterError::unreadable(path, e))?;
        Self::from_yaml(&contents, path)
    }

    /// Parse keyword rules. `source` is recorded on the table and used in errors.
    pub fn from_yaml(yaml: &str, source: impl Into<PathBuf>) -> Result<Self, FilterError> {
        let source = source.into();

        if yaml.trim().is_empty() {
            return Err(FilterError::unreadable(source, "rule source is empty"));
        }

        let file = RuleFile::from_yaml(yaml)
            .map_err(|e| FilterError::unreadable(&source, format!("{:#}", e)))?;

        let rules = file
            .keywords
            .iter()
            .enumerate()
            .map(|(index, config)| FilterRule::from_config(index, config))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            source: Some(source),
        })
    }

    /// Where the rules came from. `None` for the inert table.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// True for the table installed before any successful load.
    pub fn is_inert(&self) -> bool {
        self.source.is_none()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FilterRule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterRule> {
        self.rules.iter()
    }

    /// First rule, in declaration order, whose pattern matches `text`.
    pub fn first_match(&self, text: &str) -> Option<(usize, &FilterRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(text))
    }
}
