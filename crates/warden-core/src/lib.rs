//! Core moderation logic for the Warden group bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the
//! [`platform::ChatPlatform`] port, implemented in `warden-telegram`.

pub mod access;
pub mod classify;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod event;
pub mod formatting;
pub mod journal;
pub mod logging;
pub mod pipeline;
pub mod platform;
pub mod wordlist;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{Error, Result};
