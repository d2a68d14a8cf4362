// Per-guild active language lists
// Held in memory, written back to disk once on shutdown

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use dashmap::DashMap;
use tracing::{info, warn};

use crate::features::chat_store::{write_json, StoreError};
use crate::utils::flags::default_languages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotInList,
    NoneConfigured,
}

pub struct LanguageStore {
    path: PathBuf,
    guilds: DashMap<String, Vec<String>>,
}

impl LanguageStore {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guilds: DashMap::new(),
        }
    }

    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::empty(path);
        match tokio::fs::read_to_string(&store.path).await {
            Ok(raw) => {
                let loaded: HashMap<String, Vec<String>> =
                    serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                        path: store.path.clone(),
                        source,
                    })?;
                for (guild_id, languages) in loaded {
                    store.guilds.insert(guild_id, languages);
                }
                info!("Server languages loaded from {:?}", store.path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("No server languages file at {:?}", store.path);
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: store.path.clone(),
                    source,
                })
            }
        }
        Ok(store)
    }

    /// The guild's explicit list, if it has one
    pub fn configured(&self, guild_id: &str) -> Option<Vec<String>> {
        self.guilds.get(guild_id).map(|langs| langs.clone())
    }

    /// Explicit list, or the quick-translate defaults
    pub fn active(&self, guild_id: &str) -> Vec<String> {
        self.configured(guild_id).unwrap_or_else(default_languages)
    }

    /// Returns false if the language was already present
    pub fn add(&self, guild_id: &str, lang: &str) -> bool {
        // The entry guard holds the shard lock for the whole check-and-push
        let mut langs = self.guilds.entry(guild_id.to_string()).or_default();
        if langs.iter().any(|l| l == lang) {
            return false;
        }
        langs.push(lang.to_string());
        true
    }

    pub fn remove(&self, guild_id: &str, lang: &str) -> RemoveOutcome {
        let Some(mut langs) = self.guilds.get_mut(guild_id) else {
            return RemoveOutcome::NoneConfigured;
        };
        match langs.iter().position(|l| l == lang) {
            Some(idx) => {
                langs.remove(idx);
                RemoveOutcome::Removed
            }
            None => RemoveOutcome::NotInList,
        }
    }

    pub async fn save(&self) -> Result<(), StoreError> {
        let snapshot: BTreeMap<String, Vec<String>> = self
            .guilds
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        write_json(&self.path, &snapshot).await?;
        info!("Server languages configuration saved to {:?}", self.path);
        Ok(())
    }
}
