//! Filter errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or reloading the rule table.
///
/// None of these ever reach the message path: checks always produce a
/// definite outcome.
#[derive(Debug, Error)]
pub enum FilterError {
    /// No rule source location configured.
    #[error("could not find a filter rule source: `filter.file` is not set")]
    ConfigMissing,

    /// Rule source configured but could not be read or parsed.
    #[error("failed to read filter rules from {}: {reason}", path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },

    /// A keyword entry is malformed.
    #[error("invalid keyword #{index}: {message}")]
    InvalidRule { index: usize, message: String },
}

impl FilterError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ConfigUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
