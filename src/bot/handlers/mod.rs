//! Discord event handlers
//!
//! Slash commands are handled by poise; every other event the bot cares about
//! arrives here.

/// Plain message handling
pub mod message;

pub use message::event_handler;
