//! # edgewatch-core
//!
//! The poll-diff-react loop at the heart of edgewatch.
//!
//! A [`Watcher`] samples one hash field at a fixed interval, remembers the
//! last value it saw, and when the field moves along the configured
//! [`Edge`] (for example `stand-by` → `parked`) runs the configured
//! [`Reaction`]s once. Read, write and publish failures are logged and the
//! loop carries on at the next tick.
//!
//! ## Key components
//!
//! - [`WatchConfig`] — file/CLI configuration, validated into [`WatchSettings`]
//! - [`Edge`] — the `(from, to)` transition that triggers reactions
//! - [`Reaction`] / [`execute_reactions`] — side effects run on the edge
//! - [`Watcher`] — the loop itself, with [`Watcher::run`] and
//!   [`Watcher::poll_cycle`]

pub mod config;
pub mod edge;
pub mod error;
pub mod reaction;
pub mod watcher;

pub use config::{FieldRef, WatchConfig, WatchSettings};
pub use edge::Edge;
pub use error::WatchError;
pub use reaction::{execute_reactions, Reaction, ReactionOutcome, ReactionReport};
pub use watcher::{CycleOutcome, WatchStats, Watcher};
