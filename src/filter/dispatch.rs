//! Turns a rule match into side effects.

use std::sync::Arc;

use tracing::info;

use super::action::FilterAction;
use super::context::{MessageContext, MessageKind, Outcome};
use super::events::{FilterEvent, FilterEventLog};
use super::rule::FilterRule;
use crate::host::{LogLevel, ServerHooks};

/// Applies the action of a matched rule.
#[derive(Clone)]
pub struct Dispatcher {
    hooks: Arc<dyn ServerHooks>,
    events: Arc<FilterEventLog>,
}

impl Dispatcher {
    pub fn new(hooks: Arc<dyn ServerHooks>, events: Arc<FilterEventLog>) -> Self {
        Self { hooks, events }
    }

    /// Apply `rule` to a message that matched it.
    ///
    /// Always intervenes. Host calls happen in this order: operator alert and
    /// sender notice (block only), log entry, session termination (kill only).
    pub fn dispatch(
        &self,
        rule: &FilterRule,
        kind: MessageKind,
        ctx: &MessageContext<'_>,
    ) -> Outcome {
        let target = ctx.destination.target_name();
        let nick = ctx.sender.nick.as_str();
        let reason = rule.reason();
        let action = rule.action();

        rule.record_hit();

        if action == FilterAction::Block {
            self.hooks.send_opers(&format!(
                "FILTER: {} had their {} filtered, target was {}: {}",
                nick, kind, target, reason
            ));
            self.hooks.send_notice(
                ctx.sender,
                &format!(
                    "Your {} has been filtered and opers notified: {}",
                    kind, reason
                ),
            );
        }

        self.hooks.log(
            LogLevel::Info,
            &format!(
                "FILTER: {} had their {} filtered, target was {}: {} Action: {}",
                nick, kind, target, reason, action
            ),
        );

        info!(
            sender = %nick,
            session = %ctx.sender.id,
            kind = %kind,
            target = %target,
            pattern = %rule.pattern(),
            action = %action,
            "message filtered"
        );

        self.events.record(FilterEvent {
            timestamp: chrono::Utc::now(),
            kind,
            session: ctx.sender.id,
            sender: nick.to_string(),
            target: target.to_string(),
            pattern: rule.pattern().to_string(),
            reason: reason.to_string(),
            action,
            text_preview: ctx.text.chars().take(50).collect(),
        });

        if action == FilterAction::Kill {
            self.hooks.quit_user(ctx.sender, reason);
        }

        Outcome::filtered(action)
    }
}
