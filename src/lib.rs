//! Keyword filter for chat server messages and notices.
//!
//! The host server calls [`FilterEngine::on_pre_message`] and
//! [`FilterEngine::on_pre_notice`] before delivering text. A `true` answer
//! means the filter intervened and the text must not be delivered.
//!
//! ```no_run
//! use std::sync::Arc;
//! use chatfilter::filter::{Destination, FilterEngine};
//! use chatfilter::host::{ChannelRef, TracingHooks, UserRef};
//!
//! let engine = FilterEngine::new("/etc/chat/server.yaml", Arc::new(TracingHooks));
//! if let Err(e) = engine.initialize() {
//!     eprintln!("filter inactive: {e}");
//! }
//!
//! let sender = UserRef::new(1, "alice");
//! let dest = Destination::Channel(ChannelRef::new("#lobby"));
//! let suppress = engine.on_pre_message(&sender, &dest, "hello");
//! # let _ = suppress;
//! ```

pub mod config;
pub mod filter;
pub mod host;
pub mod telemetry;

pub use filter::FilterEngine;
