// Flag reactions on messages in enabled channels

use futures::future::join_all;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

use crate::features::detection::detect_language;
use crate::features::translation;
use crate::models::chat_config::{ChatConfig, ALL_CHANNELS};
use crate::utils::config::{Settings, BACKFILL_LIMIT};
use crate::utils::flags::{same_language, FLAGS};
use crate::Data;

/// Registry flags whose language is active and differs from the detected one
pub fn select_flags(detected: &str, active: &[String]) -> Vec<&'static str> {
    FLAGS
        .iter()
        .filter(|flag| active.iter().any(|lang| same_language(lang, flag.lang)))
        .filter(|flag| !same_language(flag.lang, detected))
        .map(|flag| flag.emoji)
        .collect()
}

/// Detect the message language and pick the flags for this guild
pub fn flags_for(data: &Data, guild_id: serenity::GuildId, content: &str) -> Vec<&'static str> {
    let detected = detect_language(content);
    debug!("Detected language: {}", detected);
    let active = data.languages.active(&guild_id.to_string());
    select_flags(&detected, &active)
}

fn flag_reaction(flag: &str) -> serenity::ReactionType {
    serenity::ReactionType::Unicode(flag.to_string())
}

/// Attach every flag concurrently; one failed reaction does not stop the rest
async fn attach_flags(http: &serenity::Http, msg: &serenity::Message, flags: &[&'static str]) {
    let results = join_all(flags.iter().map(|flag| msg.react(http, flag_reaction(flag)))).await;
    for (flag, result) in flags.iter().zip(results) {
        if let Err(e) = result {
            error!("Failed to react with {} on message {}: {:?}", flag, msg.id, e);
        }
    }
}

/// Reactions only happen in allow-listed guilds, in channels enabled there
pub fn should_handle(
    settings: &Settings,
    config: &ChatConfig,
    guild_id: serenity::GuildId,
    channel_id: serenity::ChannelId,
) -> bool {
    settings.is_guild_allowed(guild_id)
        && config.is_channel_allowed(&guild_id.to_string(), &channel_id.to_string())
}

async fn channel_allowed(data: &Data, guild_id: serenity::GuildId, channel_id: serenity::ChannelId) -> bool {
    let config = data.chat_config.read().await;
    should_handle(&data.settings, &config, guild_id, channel_id)
}

/// Text and announcement channels carry a message history worth backfilling
fn is_backfill_channel(kind: serenity::ChannelType) -> bool {
    matches!(kind, serenity::ChannelType::Text | serenity::ChannelType::News)
}

/// Apply the flag reactions to one message; returns the flags attached
pub async fn react_to_message(
    http: &serenity::Http,
    data: &Data,
    guild_id: serenity::GuildId,
    msg: &serenity::Message,
) -> Vec<&'static str> {
    if msg.author.bot {
        return Vec::new();
    }
    let content = msg.content.trim();
    if content.is_empty() {
        return Vec::new();
    }

    let flags = flags_for(data, guild_id, content);
    attach_flags(http, msg, &flags).await;
    flags
}

/// New message in a guild channel
pub async fn handle_new_message(
    http: &serenity::Http,
    data: &Data,
    msg: &serenity::Message,
) -> anyhow::Result<()> {
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };
    if msg.author.bot || !channel_allowed(data, guild_id, msg.channel_id).await {
        return Ok(());
    }

    let flags = react_to_message(http, data, guild_id, msg).await;

    if data.settings.auto_translate && !flags.is_empty() {
        translation::post_translations(http, data, msg, &flags).await;
    }
    Ok(())
}

/// Edited message: drop the stale reactions and apply the recomputed set
pub async fn handle_message_update(
    http: &serenity::Http,
    data: &Data,
    event: &serenity::MessageUpdateEvent,
) -> anyhow::Result<()> {
    let Some(guild_id) = event.guild_id else {
        return Ok(());
    };
    if !channel_allowed(data, guild_id, event.channel_id).await {
        return Ok(());
    }

    let msg = event.channel_id.message(http, event.id).await?;
    if msg.author.bot {
        return Ok(());
    }
    let content = msg.content.trim();
    if content.is_empty() {
        return Ok(());
    }

    let flags = flags_for(data, guild_id, content);

    // Flags that stay are left alone so the removal can't race the re-add
    let stale: Vec<serenity::ReactionType> = msg
        .reactions
        .iter()
        .map(|r| r.reaction_type.clone())
        .filter(|rt| match rt {
            serenity::ReactionType::Unicode(s) => !flags.iter().any(|f| *f == s.as_str()),
            _ => true,
        })
        .collect();

    let removals = join_all(stale.into_iter().map(|rt| msg.delete_reaction_emoji(http, rt)));
    let ((), removed) = tokio::join!(attach_flags(http, &msg, &flags), removals);

    for result in removed {
        if let Err(e) = result {
            error!("Failed to clear reaction on message {}: {:?}", msg.id, e);
        }
    }
    Ok(())
}

/// Re-apply reactions to the most recent messages of a channel
pub async fn backfill_channel(
    http: &serenity::Http,
    data: &Data,
    guild_id: serenity::GuildId,
    channel_id: serenity::ChannelId,
) -> anyhow::Result<usize> {
    let messages = channel_id
        .messages(http, serenity::GetMessages::new().limit(BACKFILL_LIMIT))
        .await?;

    let mut reacted = 0;
    for msg in &messages {
        if !react_to_message(http, data, guild_id, msg).await.is_empty() {
            reacted += 1;
        }
    }
    info!("Backfilled {} of {} messages in channel {}", reacted, messages.len(), channel_id);
    Ok(reacted)
}

/// Startup pass over every enabled text channel of an allowed guild
pub async fn backfill_guild(http: &serenity::Http, data: &Data, guild_id: serenity::GuildId) {
    let configured = data.chat_config.channels(&guild_id.to_string()).await;
    if configured.is_empty() {
        return;
    }

    let channels = match guild_id.channels(http).await {
        Ok(channels) => channels,
        Err(e) => {
            warn!("Could not list channels of guild {}: {:?}", guild_id, e);
            return;
        }
    };

    let all = configured.iter().any(|c| c == ALL_CHANNELS);
    for (channel_id, channel) in channels {
        if !is_backfill_channel(channel.kind) {
            continue;
        }
        if !all && !configured.contains(&channel_id.to_string()) {
            continue;
        }
        if let Err(e) = backfill_channel(http, data, guild_id, channel_id).await {
            error!("Error fetching messages in channel {}: {:?}", channel_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn guild(id: u64) -> serenity::GuildId {
        serenity::GuildId::new(id)
    }

    fn channel(id: u64) -> serenity::ChannelId {
        serenity::ChannelId::new(id)
    }

    #[test]
    fn test_should_handle_allowed_guild_and_channel() {
        let settings = Settings::for_guilds(&[1]);
        let mut config = ChatConfig::default();
        config.add_channel("1", "10");

        assert!(should_handle(&settings, &config, guild(1), channel(10)));
        assert!(!should_handle(&settings, &config, guild(1), channel(11)));
    }

    #[test]
    fn test_should_handle_ignores_guilds_outside_allow_list() {
        let settings = Settings::for_guilds(&[1]);
        let mut config = ChatConfig::default();
        config.add_channel("1", "10");
        config.add_channel("2", "20");
        config.add_channel("3", ALL_CHANNELS);

        // Enabled channels do not matter once the guild itself is not allowed
        assert!(!should_handle(&settings, &config, guild(2), channel(20)));
        assert!(!should_handle(&settings, &config, guild(3), channel(30)));
    }

    #[test]
    fn test_should_handle_all_channels() {
        let settings = Settings::for_guilds(&[1]);
        let mut config = ChatConfig::default();
        config.add_channel("1", ALL_CHANNELS);

        assert!(should_handle(&settings, &config, guild(1), channel(99)));
    }

    #[test]
    fn test_backfill_channel_kinds() {
        assert!(is_backfill_channel(serenity::ChannelType::Text));
        assert!(is_backfill_channel(serenity::ChannelType::News));
        assert!(!is_backfill_channel(serenity::ChannelType::Voice));
        assert!(!is_backfill_channel(serenity::ChannelType::Category));
    }

    #[test]
    fn test_french_message_gets_active_flags() {
        assert_eq!(select_flags("fr", &langs(&["en", "ru"])), vec!["🇬🇧", "🇷🇺"]);
    }

    #[test]
    fn test_source_language_is_skipped() {
        assert_eq!(select_flags("en", &langs(&["en", "ru"])), vec!["🇷🇺"]);
        assert_eq!(select_flags("zh", &langs(&["zh-CN", "ja"])), vec!["🇯🇵"]);
    }

    #[test]
    fn test_registry_order_wins() {
        assert_eq!(
            select_flags("unknown", &langs(&["ja", "de", "en"])),
            vec!["🇬🇧", "🇩🇪", "🇯🇵"]
        );
    }

    #[test]
    fn test_unregistered_or_empty_languages() {
        assert!(select_flags("en", &langs(&["xx"])).is_empty());
        assert!(select_flags("en", &[]).is_empty());
    }
}
