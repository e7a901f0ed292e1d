//! Host hooks backed by `tracing`.

use tracing::{debug, error, info, warn};

use super::{LogLevel, ServerHooks, UserRef};

/// Emits every host side effect as a structured log event.
///
/// Used by the CLI, where there is no real server to notify.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

impl ServerHooks for TracingHooks {
    fn send_opers(&self, message: &str) {
        warn!(target: "chatfilter::opers", "{}", message);
    }

    fn send_notice(&self, to: &UserRef, message: &str) {
        info!(
            target: "chatfilter::notice",
            session = %to.id,
            "NOTICE {} :{}",
            to.nick,
            message
        );
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!(target: "chatfilter::log", "{}", message),
            LogLevel::Info => info!(target: "chatfilter::log", "{}", message),
            LogLevel::Warn => warn!(target: "chatfilter::log", "{}", message),
            LogLevel::Error => error!(target: "chatfilter::log", "{}", message),
        }
    }

    fn quit_user(&self, user: &UserRef, reason: &str) {
        warn!(
            target: "chatfilter::quit",
            session = %user.id,
            nick = %user.nick,
            reason = %reason,
            "terminating session"
        );
    }
}
