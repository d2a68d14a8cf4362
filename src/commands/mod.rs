// Slash command modules
pub mod chat;
pub mod help;
pub mod language;
pub mod moderation;
pub mod schedule;
pub mod server_info;

use crate::{Context, Error};

/// Reply visible only to the invoking user
pub async fn reply_ephemeral(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Guild of the invocation as a config key; commands are all `guild_only`
pub fn guild_key(ctx: Context<'_>) -> Result<String, Error> {
    ctx.guild_id()
        .map(|id| id.to_string())
        .ok_or_else(|| "This command can only be used in a server.".into())
}
