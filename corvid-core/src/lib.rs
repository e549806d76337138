//! corvid, a command-handling framework for Discord bots.
//!
//! Bot authors declare commands, subcommands and event listeners as
//! plain values; the framework takes care of registration, prefix
//! parsing, cooldown tracking, permission and tag validation, argument
//! resolution and dispatch. The chat platform itself is consumed through
//! the [`platform::Platform`] capability trait; the gateway connection
//! and process bootstrap belong to the host.
//!
//! The usual wiring:
//!
//! 1. Load a [`corvid_common::config::CorvidConfig`].
//! 2. Construct a [`corvid::Corvid`] with it and a platform handle
//!    (usually [`platform::twilight_rest::TwilightRest`]).
//! 3. Register commands built with [`command::CommandBuilder`] and event
//!    listeners built with [`events::EventListener`].
//! 4. Feed gateway messages and interactions into
//!    [`dispatch::handle_message`] / [`dispatch::handle_interaction`].

pub mod command;
pub mod cooldowns;
pub mod corvid;
pub mod dispatch;
pub mod events;
pub mod platform;

pub use crate::corvid::{Corvid, ThreadSafeCorvid};

#[cfg(test)]
pub(crate) mod test_util;
