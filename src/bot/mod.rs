//! Bot layer - Discord-specific interface and command handlers
//!
//! This module wires the router into poise: slash commands dispatch a single
//! [`Command`], ordinary messages go through the message handler, and replies are
//! delivered by [`reply`].

/// Discord slash command implementations (general, report, ledger)
pub mod commands;
/// Discord event handlers (plain messages)
pub mod handlers;
/// Reply delivery: escaping, splitting and send timeouts
pub mod reply;

use crate::{
    core::router::{Command, Router},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands and handlers.
pub struct BotData {
    /// Router that answers every command and message
    pub router: Router,
}

impl BotData {
    /// Creates a new `BotData` instance around the router.
    #[must_use]
    pub const fn new(router: Router) -> Self {
        Self { router }
    }
}

/// Ledger owner id for a Discord user.
///
/// Snowflakes fit in 63 bits; `None` is returned if one ever does not.
#[must_use]
pub fn owner_id(user_id: serenity::UserId) -> Option<i64> {
    i64::try_from(user_id.get()).ok()
}

/// Runs `command` for the invoking user and sends the reply.
pub async fn run_command(ctx: poise::Context<'_, BotData, Error>, command: Command) -> Result<()> {
    let Some(owner_id) = owner_id(ctx.author().id) else {
        warn!(user_id = %ctx.author().id, "User id does not fit an owner id");
        return Ok(());
    };

    let reply = ctx.data().router.dispatch(owner_id, command).await;
    reply::send_command_reply(ctx, reply).await
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {}", ctx.command().name, error);
            if let Err(e) = ctx.say("Произошла ошибка. Попробуйте еще раз.").await {
                error!("Failed to send error message: {}", e);
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error handling event {}: {}", event.snake_case_name(), error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and serves until the connection closes.
#[instrument(skip_all)]
pub async fn run_bot(token: &str, router: Router) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(router))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
