use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel entry enabling every channel of a guild
pub const ALL_CHANNELS: &str = "ALL";

/// Channel allow-list document, keyed by guild id
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ChatConfig {
    #[serde(default)]
    pub servers: BTreeMap<String, ServerChannels>,
}

/// Allowed channels for one guild
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ServerChannels {
    #[serde(default)]
    pub channels: Vec<String>,
}

impl ServerChannels {
    pub fn allows_all(&self) -> bool {
        self.channels.iter().any(|c| c == ALL_CHANNELS)
    }

    pub fn allows(&self, channel_id: &str) -> bool {
        self.allows_all() || self.channels.iter().any(|c| c == channel_id)
    }
}

impl ChatConfig {
    /// A guild that is not present is fully disallowed
    pub fn is_channel_allowed(&self, guild_id: &str, channel_id: &str) -> bool {
        self.servers
            .get(guild_id)
            .is_some_and(|server| server.allows(channel_id))
    }

    pub fn channels(&self, guild_id: &str) -> Vec<String> {
        self.servers
            .get(guild_id)
            .map(|server| server.channels.clone())
            .unwrap_or_default()
    }

    /// Returns false if the channel was already listed
    pub fn add_channel(&mut self, guild_id: &str, channel_id: &str) -> bool {
        let server = self.servers.entry(guild_id.to_string()).or_default();
        if server.channels.iter().any(|c| c == channel_id) {
            return false;
        }
        server.channels.push(channel_id.to_string());
        true
    }

    /// Returns false if the channel was not listed
    pub fn remove_channel(&mut self, guild_id: &str, channel_id: &str) -> bool {
        let Some(server) = self.servers.get_mut(guild_id) else {
            return false;
        };
        let before = server.channels.len();
        server.channels.retain(|c| c != channel_id);
        server.channels.len() != before
    }
}
