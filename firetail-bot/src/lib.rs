//! Firetail bot library
//!
//! Assembles the poise framework around the command crate: dynamic prefix
//! resolution, the global anti-spam check, gateway event handling, and the
//! exit-code lifecycle.

pub mod bot;
pub mod error;
pub mod events;

pub use bot::Firetail;
pub use error::{BotError, BotResult};
