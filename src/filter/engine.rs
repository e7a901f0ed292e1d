//! Filter engine: the entry points the chat server calls.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, error, info, trace};

use super::context::{Destination, MessageContext, MessageKind, Outcome};
use super::dispatch::Dispatcher;
use super::error::FilterError;
use super::events::FilterEventLog;
use super::reload::{ReloadController, ReloadReport};
use super::rule::RuleTable;
use crate::host::{LogLevel, ServerHooks, UserRef};

const DEFAULT_EVENT_LOG_SIZE: usize = 1000;

/// Message and notice filter.
///
/// Starts inert (every message passes) until [`initialize`](Self::initialize)
/// loads a rule table. Checks take a snapshot of the current table, so a
/// reload never affects a check already in progress.
pub struct FilterEngine {
    controller: ReloadController,
    hooks: Arc<dyn ServerHooks>,
    events: Arc<FilterEventLog>,
    dispatcher: Dispatcher,
    table: watch::Sender<Arc<RuleTable>>,
    /// Serializes loads; checks never take it.
    reload_lock: Mutex<()>,
}

impl FilterEngine {
    /// Create an inert engine that will read `config_path` on load.
    pub fn new(config_path: impl Into<PathBuf>, hooks: Arc<dyn ServerHooks>) -> Self {
        let events = Arc::new(FilterEventLog::new(DEFAULT_EVENT_LOG_SIZE));
        let dispatcher = Dispatcher::new(hooks.clone(), events.clone());
        let (table, _) = watch::channel(Arc::new(RuleTable::inert()));

        Self {
            controller: ReloadController::new(config_path),
            hooks,
            events,
            dispatcher,
            table,
            reload_lock: Mutex::new(()),
        }
    }

    /// Keep `capacity` recent events instead of the default.
    pub fn with_event_log_size(mut self, capacity: usize) -> Self {
        self.events = Arc::new(FilterEventLog::new(capacity));
        self.dispatcher = Dispatcher::new(self.hooks.clone(), self.events.clone());
        self
    }

    /// First load. On failure the engine stays inert and the error is reported.
    pub fn initialize(&self) -> Result<ReloadReport, FilterError> {
        self.load("initialize")
    }

    /// Reload rules on a rehash request.
    ///
    /// The new table replaces the current one only if it loads cleanly;
    /// otherwise the previous rules stay in effect.
    pub fn on_reload(&self, parameter: &str) -> Result<ReloadReport, FilterError> {
        debug!(parameter = %parameter, "rehash requested");
        self.load("reload")
    }

    fn load(&self, trigger: &str) -> Result<ReloadReport, FilterError> {
        // Hooks run after the guard is released so a host may rehash from inside one.
        let (result, was_active) = {
            let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
            let was_active = self.is_active();

            let result = self.controller.build().map(|table| {
                let report = ReloadReport {
                    source: table.source().map(PathBuf::from).unwrap_or_default(),
                    rules: table.len(),
                };
                self.install(table);
                report
            });

            (result, was_active)
        };

        match result {
            Ok(report) => {
                self.hooks.log(
                    LogLevel::Info,
                    &format!(
                        "m_filter: read configuration from {}",
                        report.source.display()
                    ),
                );
                info!(
                    trigger,
                    source = %report.source.display(),
                    rules = report.rules,
                    "keyword rules loaded"
                );
                metrics::counter!("chatfilter.rules.reloads").increment(1);

                Ok(report)
            }
            Err(e) => {
                let message = if was_active {
                    format!("FILTER: failed to reload rules, keeping previous rules: {}", e)
                } else {
                    format!("FILTER: failed to load rules, filter is inactive: {}", e)
                };

                error!(trigger, error = %e, active = was_active, "keyword rules not loaded");
                self.hooks.log(LogLevel::Error, &message);
                self.hooks.send_opers(&message);
                metrics::counter!("chatfilter.rules.reload_failures").increment(1);

                Err(e)
            }
        }
    }

    /// Replace the live table.
    pub fn install(&self, table: RuleTable) {
        self.table.send_replace(Arc::new(table));
    }

    /// Drop the active rules. Every later check passes until the next load.
    pub fn shutdown(&self) {
        let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.install(RuleTable::inert());
        info!("filter shut down");
    }

    /// Check a private message or channel message.
    pub fn on_pre_message(&self, sender: &UserRef, destination: &Destination, text: &str) -> bool {
        self.check(
            MessageKind::Message,
            &MessageContext::new(sender, destination, text),
        )
        .intervened
    }

    /// Check a notice.
    pub fn on_pre_notice(&self, sender: &UserRef, destination: &Destination, text: &str) -> bool {
        self.check(
            MessageKind::Notice,
            &MessageContext::new(sender, destination, text),
        )
        .intervened
    }

    /// Run a message through the rules, applying the first match.
    pub fn check(&self, kind: MessageKind, ctx: &MessageContext<'_>) -> Outcome {
        let table = self.rules();
        metrics::counter!("chatfilter.messages.checked").increment(1);

        match table.first_match(ctx.text) {
            Some((index, rule)) => {
                trace!(index, pattern = %rule.pattern(), "keyword matched");
                metrics::counter!(
                    "chatfilter.messages.filtered",
                    "action" => rule.action().as_str()
                )
                .increment(1);
                self.dispatcher.dispatch(rule, kind, ctx)
            }
            None => Outcome::pass(),
        }
    }

    /// Current rule table.
    pub fn rules(&self) -> Arc<RuleTable> {
        self.table.borrow().clone()
    }

    /// Notified whenever a new table is installed.
    pub fn subscribe(&self) -> watch::Receiver<Arc<RuleTable>> {
        self.table.subscribe()
    }

    /// True once a rule table has been loaded.
    pub fn is_active(&self) -> bool {
        !self.table.borrow().is_inert()
    }

    pub fn controller(&self) -> &ReloadController {
        &self.controller
    }

    pub fn events(&self) -> Arc<FilterEventLog> {
        self.events.clone()
    }

    /// Snapshot of the active table and its per-rule hit counts.
    pub fn stats(&self) -> FilterStats {
        let table = self.rules();
        FilterStats {
            active: !table.is_inert(),
            source: table.source().map(PathBuf::from),
            rules: table.len(),
            rule_hits: table
                .iter()
                .map(|rule| RuleHits {
                    pattern: rule.pattern().to_string(),
                    hits: rule.hits(),
                })
                .collect(),
        }
    }
}

/// Filter statistics.
#[derive(Debug, Clone)]
pub struct FilterStats {
    pub active: bool,
    pub source: Option<PathBuf>,
    pub rules: usize,
    /// In declaration order
    pub rule_hits: Vec<RuleHits>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHits {
    pub pattern: String,
    pub hits: u64,
}
