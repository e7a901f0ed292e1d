use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration, as far as the filter cares.
///
/// The host config may carry any number of other sections; they are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Filter module settings
    #[serde(default)]
    pub filter: FilterSettings,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

/// `filter:` section
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    /// Path to the keyword rule file.
    ///
    /// May point at the main config file itself when the `keywords` list is
    /// kept there. Relative paths resolve against the main config's directory.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Reload automatically when the rule file or main config changes
    #[serde(default)]
    pub watch: bool,

    /// Wait this long after a change before reloading
    #[serde(default = "default_debounce", with = "humantime_serde")]
    pub debounce: Duration,

    /// Number of recent filter events kept in memory
    #[serde(default = "default_event_log_size")]
    pub event_log_size: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            file: None,
            watch: false,
            debounce: default_debounce(),
            event_log_size: default_event_log_size(),
        }
    }
}

fn default_debounce() -> Duration {
    Duration::from_millis(500)
}

fn default_event_log_size() -> usize {
    1000
}

/// `telemetry:` section
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// Log level filter (overridden by `RUST_LOG`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Keyword rule source.
///
/// Unknown top-level keys are ignored so that the rules can live in the
/// main config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleFile {
    /// Keyword entries, in evaluation order
    #[serde(default)]
    pub keywords: Vec<KeywordConfig>,
}

/// A single `keywords:` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    /// Glob pattern matched against message text
    pub pattern: String,

    /// Shown to operators and the sender, written to the log
    #[serde(default)]
    pub reason: String,

    /// `block`, `kill`, `none` or absent
    #[serde(default)]
    pub action: Option<String>,
}
