//! Per-message evaluation context and outcome.

use std::fmt;

use super::action::FilterAction;
use crate::host::{ChannelRef, UserRef};

/// Which kind of text is being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Message,
    Notice,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Message => "message",
            MessageKind::Notice => "notice",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of delivery target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    User,
    Channel,
}

/// Where a message is headed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    User(UserRef),
    Channel(ChannelRef),
}

impl Destination {
    pub fn kind(&self) -> DestinationKind {
        match self {
            Destination::User(_) => DestinationKind::User,
            Destination::Channel(_) => DestinationKind::Channel,
        }
    }

    /// Nick of the target user or name of the target channel.
    pub fn target_name(&self) -> &str {
        match self {
            Destination::User(user) => &user.nick,
            Destination::Channel(channel) => &channel.name,
        }
    }
}

impl From<UserRef> for Destination {
    fn from(user: UserRef) -> Self {
        Destination::User(user)
    }
}

impl From<ChannelRef> for Destination {
    fn from(channel: ChannelRef) -> Self {
        Destination::Channel(channel)
    }
}

/// Everything the filter knows about one outbound message.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    /// Originating session
    pub sender: &'a UserRef,
    /// Target user or channel
    pub destination: &'a Destination,
    /// Raw message text
    pub text: &'a str,
}

impl<'a> MessageContext<'a> {
    pub fn new(sender: &'a UserRef, destination: &'a Destination, text: &'a str) -> Self {
        Self {
            sender,
            destination,
            text,
        }
    }
}

/// Result of running a message through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Normal delivery must be suppressed
    pub intervened: bool,
    /// Action of the matching rule, if any
    pub action: Option<FilterAction>,
}

impl Outcome {
    /// No rule matched; deliver normally.
    pub fn pass() -> Self {
        Self {
            intervened: false,
            action: None,
        }
    }

    /// A rule matched and its action was applied.
    pub fn filtered(action: FilterAction) -> Self {
        Self {
            intervened: true,
            action: Some(action),
        }
    }

    pub fn is_intervened(&self) -> bool {
        self.intervened
    }
}
