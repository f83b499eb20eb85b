//! Discord slash commands organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General commands (start, help)
pub mod general;

/// Data management commands (export, `clear_last`, `clear_today`)
pub mod ledger;

/// Period report commands
pub mod report;

use crate::{bot::BotData, errors::Error};

// Export commands
pub use general::*;
pub use ledger::*;
pub use report::*;

/// Every slash command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        start(),
        help(),
        today(),
        week(),
        month(),
        export(),
        clear_last(),
        clear_today(),
    ]
}
