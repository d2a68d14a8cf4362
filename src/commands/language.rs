// Language commands - manage the flags offered in this server

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::commands::{guild_key, reply_ephemeral};
use crate::features::language_store::RemoveOutcome;
use crate::utils::config::colors;
use crate::utils::flags::{default_languages, lang_to_flag, FLAGS};
use crate::{Context, Error};

/// Codes with their flag where the registry knows one
fn describe(langs: &[String]) -> String {
    langs
        .iter()
        .map(|l| match lang_to_flag(l) {
            Some(flag) => format!("{} {}", flag, l),
            None => l.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trimmed language code, or None when nothing was typed
fn language_code(input: &str) -> Option<&str> {
    let code = input.trim();
    (!code.is_empty()).then_some(code)
}

const BLANK_LANGUAGE: &str = "Please provide a language code (e.g., en, ru).";

/// Add a language to the list of available languages on the server
#[poise::command(slash_command, rename = "add-language", guild_only)]
pub async fn add_language(
    ctx: Context<'_>,
    #[description = "The language code to add (e.g., en, ru)"] language: String,
) -> Result<(), Error> {
    let guild_id = guild_key(ctx)?;
    let Some(lang) = language_code(&language) else {
        return reply_ephemeral(ctx, BLANK_LANGUAGE).await;
    };
    info!("Adding language {} for guild {}", lang, guild_id);

    if ctx.data().languages.add(&guild_id, lang) {
        reply_ephemeral(ctx, format!("Language `{}` has been added.", lang)).await
    } else {
        reply_ephemeral(ctx, format!("Language `{}` is already in the list.", lang)).await
    }
}

/// Remove a language from the list of available languages on the server
#[poise::command(slash_command, rename = "remove-language", guild_only)]
pub async fn remove_language(
    ctx: Context<'_>,
    #[description = "The language code to remove (e.g., en, ru)"] language: String,
) -> Result<(), Error> {
    let guild_id = guild_key(ctx)?;
    let Some(lang) = language_code(&language) else {
        return reply_ephemeral(ctx, BLANK_LANGUAGE).await;
    };
    info!("Removing language {} for guild {}", lang, guild_id);

    let reply = match ctx.data().languages.remove(&guild_id, lang) {
        RemoveOutcome::Removed => format!("Language `{}` has been removed.", lang),
        RemoveOutcome::NotInList => format!("Language `{}` is not in the list.", lang),
        RemoveOutcome::NoneConfigured => "No languages are configured for this server.".to_string(),
    };
    reply_ephemeral(ctx, reply).await
}

/// Show active and available languages on the server
#[poise::command(slash_command, rename = "list-languages", guild_only)]
pub async fn list_languages(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_key(ctx)?;

    let active = match ctx.data().languages.configured(&guild_id) {
        Some(langs) if langs.is_empty() => "No active languages".to_string(),
        Some(langs) => describe(&langs),
        None => format!("{} (default)", describe(&default_languages())),
    };

    let available = FLAGS
        .iter()
        .map(|f| format!("{} `{}` {}", f.emoji, f.lang, f.name))
        .collect::<Vec<_>>()
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title("Languages")
        .field("Active languages", active, false)
        .field("Available languages", available, false)
        .color(colors::INFO);

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert_eq!(language_code(" ru "), Some("ru"));
        assert_eq!(language_code(""), None);
        assert_eq!(language_code("   "), None);
    }

    #[test]
    fn test_describe() {
        let langs = vec!["en".to_string(), "xx".to_string()];
        assert_eq!(describe(&langs), "🇬🇧 en, xx");
    }
}
