// Help command - show usage guide

use poise::serenity_prelude as serenity;
use crate::{Context, Error};
use crate::utils::config::colors;

/// Show help and usage guide
#[poise::command(slash_command, guild_only)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .title("🌐 Flag Translator - Help")
        .description("React with a flag to translate a message into that language")
        .color(colors::PRIMARY)
        .field(
            "🏳️ Languages",
            "`/add-language` - Offer another language\n\
            `/remove-language` - Stop offering a language\n\
            `/list-languages` - Active and available languages",
            false,
        )
        .field(
            "💬 Channels",
            "`/add-chat` - Enable flag reactions in this channel\n\
            `/remove-chat` - Disable them again\n\
            `/chat-list` - Channels with reactions enabled",
            false,
        )
        .field(
            "🧹 Moderation",
            "`/clear-bot-messages` - Delete recent bot messages\n\
            `/clear-bot-reactions` - Remove reactions from recent bot messages",
            false,
        )
        .field(
            "⏰ Other",
            "`/schedule-message` - Send a message later (once, daily or weekly)\n\
            `/server-info` - Information about this server",
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(
            "Built with Serenity & Poise",
        ));

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true)).await?;

    Ok(())
}
