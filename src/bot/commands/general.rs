//! General Discord commands - greeting and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, run_command},
        core::router::Command,
        errors::{Error, Result},
    };

    /// Greets the user and lists what the bot understands.
    #[poise::command(slash_command)]
    pub async fn start(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        run_command(ctx, Command::Start).await
    }

    /// Shows the list of commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        run_command(ctx, Command::Start).await
    }
}

// Re-export all commands
pub use inner::*;
