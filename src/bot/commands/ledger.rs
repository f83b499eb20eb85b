//! Data management Discord commands - export and deletion.
//!
//! The no-underscore spellings (`/clearlast`, `/cleartoday`) are not registered as slash
//! commands; typed as plain messages they reach the router, which accepts both.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, run_command},
        core::router::Command,
        errors::{Error, Result},
    };

    /// Sends all your transactions as a CSV file.
    #[poise::command(slash_command)]
    pub async fn export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.defer().await?;
        run_command(ctx, Command::Export).await
    }

    /// Deletes your most recent transaction.
    #[poise::command(slash_command)]
    pub async fn clear_last(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        run_command(ctx, Command::ClearLast).await
    }

    /// Deletes all of today's transactions.
    #[poise::command(slash_command)]
    pub async fn clear_today(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        run_command(ctx, Command::ClearToday).await
    }
}

pub use inner::*;
