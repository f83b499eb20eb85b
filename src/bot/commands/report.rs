//! Report Discord commands - totals for today, this week and this month.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, run_command},
        core::{period::Period, router::Command},
        errors::{Error, Result},
    };

    /// Shows today's transactions and totals.
    #[poise::command(slash_command)]
    pub async fn today(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        run_command(ctx, Command::Report(Period::Today)).await
    }

    /// Shows this week's transactions and totals (from Monday).
    #[poise::command(slash_command)]
    pub async fn week(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        run_command(ctx, Command::Report(Period::Week)).await
    }

    /// Shows this month's transactions and totals.
    #[poise::command(slash_command)]
    pub async fn month(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        run_command(ctx, Command::Report(Period::Month)).await
    }
}

pub use inner::*;
