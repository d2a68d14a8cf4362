// Centralized configuration for the flag translator bot

use std::env;
use std::path::PathBuf;

use poise::serenity_prelude as serenity;
use thiserror::Error;

/// How many recent messages get reactions when a channel is enabled
pub const BACKFILL_LIMIT: u8 = 100;

/// Literal label translated alongside every on-demand translation
pub const TRANSLATION_LABEL: &str = "Translation";

pub const DEFAULT_CHAT_CONFIG_PATH: &str = "chatConfig.json";
pub const DEFAULT_LANGUAGE_CONFIG_PATH: &str = "serverLanguages.json";
pub const DEFAULT_TRANSLATE_API_URL: &str = "https://translate.googleapis.com";

/// Discord embed colors
pub mod colors {
    pub const PRIMARY: u32 = 0x00bfff;
    pub const INFO: u32 = 0x3498db;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid guild id `{0}` in ALLOWED_GUILD_IDS")]
    InvalidGuildId(String),
}

/// Runtime settings read from the process environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub allowed_guilds: Vec<serenity::GuildId>,
    pub chat_config_path: PathBuf,
    pub language_config_path: PathBuf,
    pub translate_api_url: String,
    pub auto_translate: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var("DISCORD_TOKEN")
            .or_else(|_| env::var("TOKEN"))
            .map_err(|_| ConfigError::Missing("DISCORD_TOKEN"))?;

        let guild_list = env::var("ALLOWED_GUILD_IDS")
            .map_err(|_| ConfigError::Missing("ALLOWED_GUILD_IDS"))?;

        Ok(Self {
            token,
            allowed_guilds: parse_guild_ids(&guild_list)?,
            chat_config_path: env::var("CHAT_CONFIG_PATH")
                .unwrap_or_else(|_| DEFAULT_CHAT_CONFIG_PATH.to_string())
                .into(),
            language_config_path: env::var("LANGUAGE_CONFIG_PATH")
                .unwrap_or_else(|_| DEFAULT_LANGUAGE_CONFIG_PATH.to_string())
                .into(),
            translate_api_url: env::var("TRANSLATE_API_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATE_API_URL.to_string()),
            auto_translate: env::var("AUTO_TRANSLATE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }

    pub fn is_guild_allowed(&self, guild_id: serenity::GuildId) -> bool {
        self.allowed_guilds.contains(&guild_id)
    }

    /// Whether an interaction from this guild may get any answer at all.
    /// DMs and guilds outside the allow-list are ignored silently.
    pub fn should_reply(&self, guild_id: Option<serenity::GuildId>) -> bool {
        guild_id.is_some_and(|id| self.is_guild_allowed(id))
    }
}

#[cfg(test)]
impl Settings {
    /// Defaults with the given allow-list
    pub fn for_guilds(guilds: &[u64]) -> Self {
        Self {
            token: String::new(),
            allowed_guilds: guilds.iter().map(|&id| serenity::GuildId::new(id)).collect(),
            chat_config_path: DEFAULT_CHAT_CONFIG_PATH.into(),
            language_config_path: DEFAULT_LANGUAGE_CONFIG_PATH.into(),
            translate_api_url: DEFAULT_TRANSLATE_API_URL.to_string(),
            auto_translate: false,
        }
    }
}

/// Parse a comma-separated list of guild ids, skipping blank entries
pub fn parse_guild_ids(raw: &str) -> Result<Vec<serenity::GuildId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<u64>() {
            Ok(id) if id != 0 => Ok(serenity::GuildId::new(id)),
            _ => Err(ConfigError::InvalidGuildId(s.to_string())),
        })
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
