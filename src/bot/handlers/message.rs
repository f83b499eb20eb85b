//! Ordinary messages: transactions and typed commands.

use crate::{
    bot::{BotData, owner_id, reply},
    core::router::InboundMessage,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::{error, info, instrument, warn};

/// Framework event hook.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("{} is connected", data_about_bot.user.name);
        }
        serenity::FullEvent::Message { new_message } => {
            handle_message(ctx, new_message, data).await;
        }
        _ => {}
    }
    Ok(())
}

/// Routes one message and sends the reply back to its channel.
///
/// Messages from bots (including this one) are ignored. Delivery failures are logged.
#[instrument(skip_all, fields(message_id = %msg.id, channel_id = %msg.channel_id))]
pub async fn handle_message(ctx: &serenity::Context, msg: &serenity::Message, data: &BotData) {
    if msg.author.bot {
        return;
    }
    let Some(owner_id) = owner_id(msg.author.id) else {
        warn!(user_id = %msg.author.id, "User id does not fit an owner id");
        return;
    };

    let inbound = InboundMessage {
        owner_id,
        chat_id: msg.channel_id.get(),
        text: msg.content.clone(),
    };
    let reply = data.router.handle_message(&inbound).await;

    if let Err(e) = reply::send_to_channel(ctx, msg.channel_id, reply).await {
        error!(owner_id, "Failed to send reply: {}", e);
    }
}
