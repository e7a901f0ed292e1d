//! In-memory host hooks.
//!
//! Records every side effect instead of performing it. Useful for tests and
//! for dry-running a rule file against sample traffic.

use std::sync::{PoisonError, RwLock};

use super::{LogLevel, ServerHooks, SessionId, UserRef};

/// A single recorded call into the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// Operator broadcast
    OperAlert(String),
    /// Server notice to a session
    Notice { to: SessionId, message: String },
    /// Server log entry
    Log { level: LogLevel, message: String },
    /// Session termination
    Quit { session: SessionId, reason: String },
}

/// Host hooks that keep calls in memory.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    calls: RwLock<Vec<HostCall>>,
}

impl RecordingHooks {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: HostCall) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// All calls, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Operator alerts.
    pub fn alerts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::OperAlert(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Notices as (recipient, text).
    pub fn notices(&self) -> Vec<(SessionId, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Notice { to, message } => Some((to, message)),
                _ => None,
            })
            .collect()
    }

    /// Log entries as (level, text).
    pub fn logs(&self) -> Vec<(LogLevel, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Log { level, message } => Some((level, message)),
                _ => None,
            })
            .collect()
    }

    /// Terminated sessions as (session, reason).
    pub fn quits(&self) -> Vec<(SessionId, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Quit { session, reason } => Some((session, reason)),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ServerHooks for RecordingHooks {
    fn send_opers(&self, message: &str) {
        self.push(HostCall::OperAlert(message.to_string()));
    }

    fn send_notice(&self, to: &UserRef, message: &str) {
        self.push(HostCall::Notice {
            to: to.id,
            message: message.to_string(),
        });
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.push(HostCall::Log {
            level,
            message: message.to_string(),
        });
    }

    fn quit_user(&self, user: &UserRef, reason: &str) {
        self.push(HostCall::Quit {
            session: user.id,
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let hooks = RecordingHooks::new();
        let user = UserRef::new(1, "bob");

        hooks.send_opers("alert");
        hooks.send_notice(&user, "hello");
        hooks.log(LogLevel::Info, "entry");
        hooks.quit_user(&user, "bye");

        assert_eq!(hooks.len(), 4);
        assert_eq!(hooks.alerts(), vec!["alert".to_string()]);
        assert_eq!(hooks.notices(), vec![(SessionId(1), "hello".to_string())]);
        assert_eq!(hooks.logs(), vec![(LogLevel::Info, "entry".to_string())]);
        assert_eq!(hooks.quits(), vec![(SessionId(1), "bye".to_string())]);
        assert_eq!(hooks.calls()[0], HostCall::OperAlert("alert".to_string()));

        hooks.clear();
        assert!(hooks.is_empty());
    }
}
