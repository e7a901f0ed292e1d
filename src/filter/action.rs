//! Filter actions.

use std::fmt;
use std::str::FromStr;

/// What happens to the sender when one of their messages matches a rule.
///
/// The message itself is suppressed for every variant; the action only
/// controls the extra side effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterAction {
    /// Log and suppress only
    #[default]
    None,
    /// Alert operators and notify the sender
    Block,
    /// Disconnect the sender
    Kill,
}

impl FilterAction {
    /// Label used in log lines and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterAction::None => "none",
            FilterAction::Block => "block",
            FilterAction::Kill => "kill",
        }
    }

    /// Parse an optional config value. Absent or blank means `None`.
    pub fn from_config(value: Option<&str>) -> Result<Self, UnknownAction> {
        match value {
            Some(v) => v.parse(),
            None => Ok(FilterAction::None),
        }
    }
}

impl fmt::Display for FilterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action string that is not one of `none`, `block`, `kill`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action `{0}` (expected none, block or kill)")]
pub struct UnknownAction(pub String);

impl FromStr for FilterAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            Ok(FilterAction::None)
        } else if trimmed.eq_ignore_ascii_case("block") {
            Ok(FilterAction::Block)
        } else if trimmed.eq_ignore_ascii_case("kill") {
            Ok(FilterAction::Kill)
        } else {
            Err(UnknownAction(trimmed.to_string()))
        }
    }
}
