//! Keyword filter for messages and notices.
//!
//! Every outbound message is matched against an ordered list of glob
//! patterns. The first matching rule wins: the message is suppressed and the
//! rule's action applied.
//!
//! # Example Rule File
//!
//! ```yaml
//! keywords:
//!   - pattern: "*free money*"
//!     reason: "Spam is not welcome here"
//!     action: block
//!
//!   - pattern: "*kill yourself*"
//!     reason: "Abuse"
//!     action: kill
//!
//!   - pattern: "stop *"
//!     reason: "Silently dropped"
//! ```
//!
//! Actions:
//! - `none` (or omitted): log and suppress
//! - `block`: also alert operators and tell the sender
//! - `kill`: also disconnect the sender

mod action;
mod context;
mod dispatch;
mod engine;
mod error;
mod events;
mod matcher;
mod reload;
mod rule;

pub use action::{FilterAction, UnknownAction};
pub use context::{Destination, DestinationKind, MessageContext, MessageKind, Outcome};
pub use dispatch::Dispatcher;
pub use engine::{FilterEngine, FilterStats, RuleHits};
pub use error::FilterError;
pub use events::{FilterEvent, FilterEventLog, FilterEventStats};
pub use matcher::{matches, GlobPattern};
pub use reload::{ReloadController, ReloadReport};
pub use rule::{FilterRule, RuleTable};
