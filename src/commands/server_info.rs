use poise::serenity_prelude as serenity;

use crate::commands::reply_ephemeral;
use crate::utils::config::colors;
use crate::{Context, Error};

/// Get detailed information about the server
#[poise::command(slash_command, rename = "server-info", guild_only)]
pub async fn server_info(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return reply_ephemeral(ctx, "This command can only be used in a server.").await;
    };

    // The cache guard must be dropped before the next await
    let cached = ctx
        .guild()
        .map(|g| (g.name.clone(), g.member_count, g.channels.len()));

    let Some((name, member_count, channel_count)) = cached else {
        return reply_ephemeral(ctx, "Server information is not available right now.").await;
    };

    let embed = serenity::CreateEmbed::new()
        .title("Server Info")
        .field("Name", name, false)
        .field(
            "Created on",
            format!("<t:{}:D>", guild_id.created_at().unix_timestamp()),
            true,
        )
        .field("Member count", member_count.to_string(), true)
        .field("Channel count", channel_count.to_string(), true)
        .color(colors::INFO);

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
