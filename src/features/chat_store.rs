// Channel allow-list store
// Every mutation rewrites the whole JSON file before the lock is released

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{info, warn};

use crate::models::chat_config::ChatConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub struct ChatConfigStore {
    path: PathBuf,
    config: RwLock<ChatConfig>,
}

impl ChatConfigStore {
    /// Load the allow-list, starting empty when the file does not exist yet
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let config = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("No chat configuration at {:?}, starting empty", path);
                ChatConfig::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        info!("Chat configuration loaded from {:?}", path);

        Ok(Self {
            path,
            config: RwLock::new(config),
        })
    }

    /// Shared view of the allow-list; don't hold it across network calls
    pub async fn read(&self) -> RwLockReadGuard<'_, ChatConfig> {
        self.config.read().await
    }

    pub async fn channels(&self, guild_id: &str) -> Vec<String> {
        self.config.read().await.channels(guild_id)
    }

    /// Returns Ok(false) when the channel was already allowed
    pub async fn add_channel(&self, guild_id: &str, channel_id: &str) -> Result<bool, StoreError> {
        let mut config = self.config.write().await;
        if !config.add_channel(guild_id, channel_id) {
            return Ok(false);
        }
        write_json(&self.path, &*config).await?;
        Ok(true)
    }

    /// Returns Ok(false) when the channel was not in the list
    pub async fn remove_channel(&self, guild_id: &str, channel_id: &str) -> Result<bool, StoreError> {
        let mut config = self.config.write().await;
        if !config.remove_channel(guild_id, channel_id) {
            return Ok(false);
        }
        write_json(&self.path, &*config).await?;
        Ok(true)
    }
}

/// Write pretty JSON through a temp file so readers never see a partial document
pub async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let data = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, data)
        .await
        .map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChatConfigStore::load(dir.path().join("chat.json")).await.unwrap();
        assert!(!store.read().await.is_channel_allowed("1", "10"));
        assert!(store.channels("1").await.is_empty());
    }

    #[tokio::test]
    async fn test_add_and_remove_persist_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        std::fs::write(&path, r#"{"servers":{"1":{"channels":["10"]}}}"#).unwrap();
        let original: ChatConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        let store = ChatConfigStore::load(&path).await.unwrap();
        assert!(store.add_channel("1", "20").await.unwrap());
        assert!(!store.add_channel("1", "20").await.unwrap());

        let on_disk: ChatConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.channels("1"), vec!["10", "20"]);
        assert!(store.read().await.is_channel_allowed("1", "20"));

        assert!(store.remove_channel("1", "20").await.unwrap());
        assert!(!store.remove_channel("1", "20").await.unwrap());

        let on_disk: ChatConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, original);
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ChatConfigStore::load(&path).await,
            Err(StoreError::Json { .. })
        ));
    }
}
