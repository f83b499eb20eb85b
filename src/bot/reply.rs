//! Delivery of router replies to Discord.
//!
//! Text replies are escaped (plain) or passed through (markdown), split to fit
//! Discord's message cap and sent one by one. Documents become attachments. Every
//! send is bounded by [`SEND_TIMEOUT`].

use crate::{
    bot::BotData,
    core::{markdown, router::Reply},
    errors::{Error, Result},
};
use poise::{CreateReply, serenity_prelude as serenity};
use std::{future::Future, time::Duration};

/// Upper bound for a single outbound send
pub const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of characters Discord accepts in one message
pub const MESSAGE_LIMIT: usize = 2000;

/// Text as it should appear on the wire.
#[must_use]
pub fn render_text(body: &str, is_markdown: bool) -> String {
    if is_markdown {
        body.to_string()
    } else {
        markdown::escape(body)
    }
}

/// Whether `chars` ends in a backslash that escapes the character after it.
fn ends_inside_escape(chars: &[char]) -> bool {
    chars.iter().rev().take_while(|&&c| c == '\\').count() % 2 == 1
}

/// Splits `text` into chunks of at most `limit` characters, preferring line breaks.
///
/// A line longer than `limit` is cut on character boundaries, never between an escaping
/// backslash and the character it escapes.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let needed = if current.is_empty() {
            line_len
        } else {
            current_len + 1 + line_len
        };

        if needed <= limit {
            if !current.is_empty() {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(line);
            current_len += line_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut start = 0;
        while chars.len() - start > limit {
            let mut end = start + limit;
            if end - start > 1 && ends_inside_escape(&chars[start..end]) {
                end -= 1;
            }
            chunks.push(chars[start..end].iter().collect());
            start = end;
        }
        current = chars[start..].iter().collect();
        current_len = chars.len() - start;
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Suppresses every ping; echoed comments may contain `@everyone` or `<@id>`.
fn no_mentions() -> serenity::CreateAllowedMentions {
    serenity::CreateAllowedMentions::new()
}

/// Channel message carrying one text chunk.
#[must_use]
pub fn text_message(chunk: String) -> serenity::CreateMessage {
    serenity::CreateMessage::new()
        .content(chunk)
        .allowed_mentions(no_mentions())
}

/// Slash-command response carrying one text chunk.
#[must_use]
pub fn text_reply(chunk: String) -> CreateReply {
    CreateReply::default()
        .content(chunk)
        .allowed_mentions(no_mentions())
}

/// Awaits `send`, giving up after `limit`.
pub async fn with_timeout<T, F>(what: &str, limit: Duration, send: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, serenity::Error>>,
{
    match tokio::time::timeout(limit, send).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(Error::Delivery {
            message: format!("{what} timed out after {}ms", limit.as_millis()),
        }),
    }
}

/// Sends `reply` to a channel, as an answer to an ordinary message.
pub async fn send_to_channel(
    ctx: &serenity::Context,
    channel_id: serenity::ChannelId,
    reply: Reply,
) -> Result<()> {
    match reply {
        Reply::Text { body, markdown } => {
            for chunk in split_message(&render_text(&body, markdown), MESSAGE_LIMIT) {
                with_timeout(
                    "message",
                    SEND_TIMEOUT,
                    channel_id.send_message(ctx, text_message(chunk)),
                )
                .await?;
            }
        }
        Reply::Document { file_name, bytes } => {
            let attachment = serenity::CreateAttachment::bytes(bytes, file_name);
            with_timeout(
                "document",
                SEND_TIMEOUT,
                channel_id.send_files(
                    ctx,
                    [attachment],
                    serenity::CreateMessage::new().allowed_mentions(no_mentions()),
                ),
            )
            .await?;
        }
    }
    Ok(())
}

/// Sends `reply` as the response to a slash command.
pub async fn send_command_reply(
    ctx: poise::Context<'_, BotData, Error>,
    reply: Reply,
) -> Result<()> {
    match reply {
        Reply::Text { body, markdown } => {
            for chunk in split_message(&render_text(&body, markdown), MESSAGE_LIMIT) {
                with_timeout(
                    "command reply",
                    SEND_TIMEOUT,
                    ctx.send(text_reply(chunk)),
                )
                .await?;
            }
        }
        Reply::Document { file_name, bytes } => {
            let attachment = serenity::CreateAttachment::bytes(bytes, file_name);
            with_timeout(
                "command document",
                SEND_TIMEOUT,
                ctx.send(
                    CreateReply::default()
                        .attachment(attachment)
                        .allowed_mentions(no_mentions()),
                ),
            )
            .await?;
        }
    }
    Ok(())
}
