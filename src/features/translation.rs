// Translation on flag reactions
// Replies are tracked in memory only so they can be removed with their reaction

use dashmap::DashMap;
use futures::future::join_all;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info};

use crate::utils::config::TRANSLATION_LABEL;
use crate::utils::flags::{flag_to_lang, same_language};
use crate::Data;

/// Where a translation reply lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyHandle {
    pub channel_id: serenity::ChannelId,
    pub message_id: serenity::MessageId,
}

/// (source message, flag) -> bot reply, for the lifetime of the process
#[derive(Debug, Default)]
pub struct TranslatedMessages {
    replies: DashMap<(serenity::MessageId, String), ReplyHandle>,
}

impl TranslatedMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, source: serenity::MessageId, flag: &str, reply: ReplyHandle) {
        self.replies.insert((source, flag.to_string()), reply);
    }

    /// Remove and return the reply recorded for this reaction
    pub fn take(&self, source: serenity::MessageId, flag: &str) -> Option<ReplyHandle> {
        self.replies
            .remove(&(source, flag.to_string()))
            .map(|(_, reply)| reply)
    }

    /// Number of replies that can still be removed
    pub fn tracked(&self) -> usize {
        self.replies.len()
    }
}

/// Target language for a reaction, if the emoji is a flag active in the guild
pub fn translation_target(emoji: &str, active: &[String]) -> Option<&'static str> {
    let lang = flag_to_lang(emoji)?;
    active
        .iter()
        .any(|l| same_language(l, lang))
        .then_some(lang)
}

pub fn format_reaction_reply(flag: &str, label: &str, text: &str) -> String {
    format!("{} - **{}:** {}", flag, label, text)
}

pub fn format_auto_reply(flag: &str, text: &str) -> String {
    format!("({}) {}", flag, text)
}

fn unicode_emoji(reaction: &serenity::Reaction) -> Option<&str> {
    match &reaction.emoji {
        serenity::ReactionType::Unicode(s) => Some(s.as_str()),
        _ => None,
    }
}

fn from_bot(reaction: &serenity::Reaction, bot_id: serenity::UserId) -> bool {
    reaction.user_id == Some(bot_id)
        || reaction.member.as_ref().is_some_and(|m| m.user.bot)
}

/// A user clicked a flag: translate the message and reply with it
pub async fn handle_reaction_add(
    http: &serenity::Http,
    data: &Data,
    bot_id: serenity::UserId,
    reaction: &serenity::Reaction,
) -> anyhow::Result<()> {
    let Some(guild_id) = reaction.guild_id else {
        return Ok(());
    };
    if from_bot(reaction, bot_id) || !data.settings.should_reply(Some(guild_id)) {
        return Ok(());
    }
    let Some(flag) = unicode_emoji(reaction) else {
        return Ok(());
    };
    let active = data.languages.active(&guild_id.to_string());
    let Some(lang) = translation_target(flag, &active) else {
        return Ok(());
    };

    let msg = reaction.message(http).await?;
    if msg.content.trim().is_empty() {
        return Ok(());
    }

    let (text, label) = match tokio::try_join!(
        data.translator.translate(&msg.content, lang),
        data.translator.translate(TRANSLATION_LABEL, lang),
    ) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Error translating message {} to {}: {:?}", msg.id, lang, e);
            return Ok(());
        }
    };

    let reply = msg
        .reply(http, format_reaction_reply(flag, &label, &text))
        .await?;
    data.translated.record(
        msg.id,
        flag,
        ReplyHandle {
            channel_id: reply.channel_id,
            message_id: reply.id,
        },
    );
    info!(
        "Posted {} translation for message {} ({} tracked)",
        lang,
        msg.id,
        data.translated.tracked()
    );
    Ok(())
}

/// A flag was taken back: delete the translation it produced
pub async fn handle_reaction_remove(
    http: &serenity::Http,
    data: &Data,
    bot_id: serenity::UserId,
    reaction: &serenity::Reaction,
) -> anyhow::Result<()> {
    if from_bot(reaction, bot_id) || !data.settings.should_reply(reaction.guild_id) {
        return Ok(());
    }
    let Some(flag) = unicode_emoji(reaction) else {
        return Ok(());
    };

    let Some(reply) = data.translated.take(reaction.message_id, flag) else {
        debug!("No translation recorded for {} on {}", flag, reaction.message_id);
        return Ok(());
    };
    reply.channel_id.delete_message(http, reply.message_id).await?;
    Ok(())
}

/// Post one translation per flag straight away
pub async fn post_translations(
    http: &serenity::Http,
    data: &Data,
    msg: &serenity::Message,
    flags: &[&'static str],
) {
    let content = msg.content.trim();

    join_all(flags.iter().filter_map(|flag| flag_to_lang(flag).map(|lang| (*flag, lang))).map(
        |(flag, lang)| async move {
            let text = match data.translator.translate(content, lang).await {
                Ok(text) => text,
                Err(e) => {
                    error!("Error translating to {}: {:?}", lang, e);
                    return;
                }
            };
            match msg.reply(http, format_auto_reply(flag, &text)).await {
                Ok(reply) => data.translated.record(
                    msg.id,
                    flag,
                    ReplyHandle {
                        channel_id: reply.channel_id,
                        message_id: reply.id,
                    },
                ),
                Err(e) => error!("Failed to post {} translation: {:?}", lang, e),
            }
        },
    ))
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: u64) -> ReplyHandle {
        ReplyHandle {
            channel_id: serenity::ChannelId::new(1),
            message_id: serenity::MessageId::new(id),
        }
    }

    #[test]
    fn test_take_removes_only_that_reply() {
        let index = TranslatedMessages::new();
        let source = serenity::MessageId::new(10);
        index.record(source, "🇫🇷", handle(100));
        index.record(source, "🇩🇪", handle(101));
        index.record(serenity::MessageId::new(11), "🇫🇷", handle(102));

        assert_eq!(index.take(source, "🇫🇷"), Some(handle(100)));
        assert_eq!(index.take(source, "🇫🇷"), None);
        assert_eq!(index.tracked(), 2);
        assert_eq!(index.take(serenity::MessageId::new(11), "🇫🇷"), Some(handle(102)));
        assert_eq!(index.take(source, "🇩🇪"), Some(handle(101)));
        assert_eq!(index.tracked(), 0);
    }

    #[test]
    fn test_translation_target() {
        let active = vec!["en".to_string(), "fr".to_string()];
        assert_eq!(translation_target("🇫🇷", &active), Some("fr"));
        assert_eq!(translation_target("🇩🇪", &active), None);
        assert_eq!(translation_target("👍", &active), None);
    }

    #[test]
    fn test_reply_formats() {
        assert_eq!(
            format_reaction_reply("🇫🇷", "Traduction", "Bonjour"),
            "🇫🇷 - **Traduction:** Bonjour"
        );
        assert_eq!(format_auto_reply("🇬🇧", "Hello"), "(🇬🇧) Hello");
    }
}
