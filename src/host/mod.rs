//! Host server integration.
//!
//! The filter never talks to sockets or session tables directly. Everything
//! it needs from the chat server goes through [`ServerHooks`]:
//! - operator broadcast
//! - server notices to a single session
//! - the server log
//! - forced session termination
//!
//! Two implementations ship with the crate:
//! - [`RecordingHooks`] keeps every call in memory (tests, dry runs)
//! - [`TracingHooks`] turns every call into a `tracing` event (CLI)

mod console;
mod memory;

pub use console::TracingHooks;
pub use memory::{HostCall, RecordingHooks};

use std::fmt;

/// Identifier of a connected client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user session as seen by the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    /// Session handle used for notices and termination
    pub id: SessionId,
    /// Current display name
    pub nick: String,
}

impl UserRef {
    pub fn new(id: u64, nick: impl Into<String>) -> Self {
        Self {
            id: SessionId(id),
            nick: nick.into(),
        }
    }
}

/// A named channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub name: String,
}

impl ChannelRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Severity for entries written to the host log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Side-effect primitives provided by the host server.
///
/// Calls are fire-and-forget. A host that fails to deliver an alert or to
/// close a session handles that on its own side; the filter has already
/// decided the outcome by the time it calls in.
pub trait ServerHooks: Send + Sync {
    /// Broadcast a message to all connected operators.
    fn send_opers(&self, message: &str);

    /// Send a server notice to a single user.
    fn send_notice(&self, to: &UserRef, message: &str);

    /// Write an entry to the server log.
    fn log(&self, level: LogLevel, message: &str);

    /// Disconnect a user, showing `reason` as the quit message.
    fn quit_user(&self, user: &UserRef, reason: &str);
}
