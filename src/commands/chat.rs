// Chat commands - choose which channels get flag reactions

use tracing::{error, info};

use crate::commands::{guild_key, reply_ephemeral};
use crate::features::reactions::backfill_channel;
use crate::models::chat_config::ALL_CHANNELS;
use crate::{Context, Error};

fn mention(channel: &str) -> String {
    if channel == ALL_CHANNELS {
        "all channels".to_string()
    } else {
        format!("<#{}>", channel)
    }
}

/// Add the current chat to the list of allowed chats for this server
#[poise::command(slash_command, rename = "add-chat", guild_only)]
pub async fn add_chat(ctx: Context<'_>) -> Result<(), Error> {
    let guild = guild_key(ctx)?;
    let channel_id = ctx.channel_id();
    let data = ctx.data();

    match data
        .chat_config
        .add_channel(&guild, &channel_id.to_string())
        .await
    {
        Ok(true) => {
            info!("Enabled channel {} in guild {}", channel_id, guild);
            reply_ephemeral(ctx, format!("Chat <#{}> has been added.", channel_id)).await?;
        }
        Ok(false) => {
            return reply_ephemeral(ctx, format!("Chat <#{}> is already allowed.", channel_id)).await;
        }
        Err(e) => {
            error!("Failed to save chat configuration: {:?}", e);
            return reply_ephemeral(ctx, "Failed to save the chat configuration.").await;
        }
    }

    // React to the history of the newly enabled channel
    if let Some(guild_id) = ctx.guild_id() {
        let http = &ctx.serenity_context().http;
        if let Err(e) = backfill_channel(http, data, guild_id, channel_id).await {
            error!("Error fetching messages in channel {}: {:?}", channel_id, e);
        }
    }
    Ok(())
}

/// Remove the current chat from the list of allowed chats for this server
#[poise::command(slash_command, rename = "remove-chat", guild_only)]
pub async fn remove_chat(ctx: Context<'_>) -> Result<(), Error> {
    let guild = guild_key(ctx)?;
    let channel_id = ctx.channel_id();

    match ctx
        .data()
        .chat_config
        .remove_channel(&guild, &channel_id.to_string())
        .await
    {
        Ok(true) => {
            info!("Disabled channel {} in guild {}", channel_id, guild);
            reply_ephemeral(ctx, format!("Chat <#{}> has been removed.", channel_id)).await
        }
        Ok(false) => {
            reply_ephemeral(ctx, format!("Chat <#{}> is not in the allowed list.", channel_id)).await
        }
        Err(e) => {
            error!("Failed to save chat configuration: {:?}", e);
            reply_ephemeral(ctx, "Failed to save the chat configuration.").await
        }
    }
}

/// Show the list of allowed chats for this server
#[poise::command(slash_command, rename = "chat-list", guild_only)]
pub async fn chat_list(ctx: Context<'_>) -> Result<(), Error> {
    let guild = guild_key(ctx)?;
    let channels = ctx.data().chat_config.channels(&guild).await;

    if channels.is_empty() {
        return reply_ephemeral(ctx, "No channels added.").await;
    }

    let list = channels
        .iter()
        .map(|c| mention(c))
        .collect::<Vec<_>>()
        .join(", ");
    reply_ephemeral(ctx, format!("Allowed chats for this server: {}", list)).await
}
