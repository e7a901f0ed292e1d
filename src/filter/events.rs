//! Recent filter events.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use super::action::FilterAction;
use super::context::MessageKind;
use crate::host::SessionId;

/// A message that matched a rule.
#[derive(Debug, Clone)]
pub struct FilterEvent {
    pub timestamp: DateTime<Utc>,
    /// Message or notice
    pub kind: MessageKind,
    /// Sender session
    pub session: SessionId,
    /// Sender nick at the time
    pub sender: String,
    /// Target nick or channel name
    pub target: String,
    /// Pattern of the matching rule
    pub pattern: String,
    pub reason: String,
    pub action: FilterAction,
    /// First 50 characters of the text
    pub text_preview: String,
}

/// Bounded log of recent filter events.
#[derive(Debug)]
pub struct FilterEventLog {
    events: RwLock<VecDeque<FilterEvent>>,
    max_events: usize,
}

impl FilterEventLog {
    pub fn new(max_events: usize) -> Self {
        let max_events = max_events.max(1);
        Self {
            events: RwLock::new(VecDeque::with_capacity(max_events)),
            max_events,
        }
    }

    /// Record an event, evicting the oldest when full.
    pub fn record(&self, event: FilterEvent) {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Most recent events, newest first.
    pub fn recent(&self, count: usize) -> Vec<FilterEvent> {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        events.iter().rev().take(count).cloned().collect()
    }

    /// Most recent events with the given action, newest first.
    pub fn by_action(&self, action: FilterAction, count: usize) -> Vec<FilterEvent> {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        events
            .iter()
            .rev()
            .filter(|e| e.action == action)
            .take(count)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-action counts over the retained events.
    pub fn stats(&self) -> FilterEventStats {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        let mut stats = FilterEventStats::default();

        for event in events.iter() {
            match event.action {
                FilterAction::None => stats.suppressed += 1,
                FilterAction::Block => stats.blocked += 1,
                FilterAction::Kill => stats.killed += 1,
            }
        }

        stats
    }
}

/// Event statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterEventStats {
    pub suppressed: u64,
    pub blocked: u64,
    pub killed: u64,
}
