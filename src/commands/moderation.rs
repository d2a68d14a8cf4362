// Moderation commands - clean up after the bot
// Permission failures are answered by the framework error handler

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::{Context, Error};

/// Recent messages in this channel that the bot wrote
async fn recent_bot_messages(ctx: Context<'_>, amount: u8) -> Result<Vec<serenity::Message>, serenity::Error> {
    let bot_id = ctx.framework().bot_id;
    let messages = ctx
        .channel_id()
        .messages(ctx.http(), serenity::GetMessages::new().limit(amount))
        .await?;
    Ok(messages
        .into_iter()
        .filter(|m| m.author.id == bot_id)
        .collect())
}

/// Clear messages from bot in this channel
#[poise::command(
    slash_command,
    rename = "clear-bot-messages",
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn clear_bot_messages(
    ctx: Context<'_>,
    #[description = "Number of recent messages to clear"]
    #[min = 1]
    #[max = 100]
    amount: u8,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let result = async {
        let messages = recent_bot_messages(ctx, amount).await?;
        for msg in &messages {
            msg.delete(ctx.http()).await?;
        }
        Ok::<_, serenity::Error>(messages.len())
    }
    .await;

    match result {
        Ok(count) => {
            info!("Removed {} bot messages in channel {}", count, ctx.channel_id());
            ctx.say(format!("Removed {} messages from the bot.", count)).await?;
        }
        Err(e) => {
            error!("Error clearing messages: {:?}", e);
            ctx.say("Error clearing messages.").await?;
        }
    }
    Ok(())
}

/// Clear reactions from bot in this channel
#[poise::command(
    slash_command,
    rename = "clear-bot-reactions",
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn clear_bot_reactions(
    ctx: Context<'_>,
    #[description = "Number of recent messages to clear"]
    #[min = 1]
    #[max = 100]
    amount: u8,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let result = async {
        let messages = recent_bot_messages(ctx, amount).await?;
        for msg in &messages {
            msg.delete_reactions(ctx.http()).await?;
        }
        Ok::<_, serenity::Error>(messages.len())
    }
    .await;

    match result {
        Ok(count) => {
            info!("Cleared reactions on {} bot messages in channel {}", count, ctx.channel_id());
            ctx.say(format!("Removed bot reactions to {} messages.", count)).await?;
        }
        Err(e) => {
            error!("Error while cleaning reactions: {:?}", e);
            ctx.say("Error clearing reactions.").await?;
        }
    }
    Ok(())
}

/// Reply used when the invoker lacks MANAGE_MESSAGES
pub fn permission_denied_message(command: &str) -> &'static str {
    match command {
        "clear-bot-reactions" => "You do not have permission to delete reactions.",
        _ => "You do not have permission to delete messages.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_messages_differ() {
        assert_ne!(
            permission_denied_message("clear-bot-messages"),
            permission_denied_message("clear-bot-reactions")
        );
    }
}
