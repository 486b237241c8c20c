//! On-disk message cache
//!
//! The corpus is persisted as a single pretty-printed JSON array. A missing or
//! unreadable file is a cache miss, never a startup failure.

use crate::models::Message;
use crate::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct MessageCache {
    path: PathBuf,
}

impl MessageCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached corpus.
    ///
    /// Returns `None` when the file is absent or cannot be read or parsed; the
    /// caller then falls back to a full fetch.
    pub async fn load(&self) -> Option<Vec<Message>> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Cache error reading {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice::<Vec<Message>>(&content) {
            Ok(messages) => {
                info!("Loaded {} messages from cache", messages.len());
                Some(messages)
            }
            Err(e) => {
                warn!("Cache error parsing {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Overwrite the cache file with `messages`. Empty corpora are not written.
    pub async fn save(&self, messages: &[Message]) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let json = serde_json::to_vec_pretty(messages)?;
        tokio::fs::write(&self.path, json).await?;

        info!("Saved {} messages to {}", messages.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn sample() -> Vec<Message> {
        vec![
            Message::new("Sophia Al-Farsi", "Please book a private jet to Paris."),
            Message::new("Fatima El-Tahir", "I need tickets for the opera."),
        ]
    }

    #[tokio::test]
    async fn test_missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = MessageCache::new(dir.path().join("absent.json"));
        assert!(cache.load().await.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let cache = MessageCache::new(dir.path().join("cache.json"));

        assert_ok!(cache.save(&sample()).await);
        let loaded = cache.load().await.expect("cache should load");

        assert_eq!(loaded, sample());
    }

    #[tokio::test]
    async fn test_saved_file_is_indented_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let cache = MessageCache::new(dir.path().join("cache.json"));
        assert_ok!(cache.save(&sample()).await);

        let text = std::fs::read_to_string(cache.path()).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"member\": \"Sophia Al-Farsi\""));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = MessageCache::new(path);
        assert!(cache.load().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_corpus_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let cache = MessageCache::new(dir.path().join("cache.json"));

        assert_ok!(cache.save(&[]).await);
        assert!(!cache.path().exists());
    }

    #[tokio::test]
    async fn test_empty_array_loads_as_zero_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "[]").unwrap();

        let cache = MessageCache::new(path);
        assert_eq!(cache.load().await, Some(Vec::new()));
    }
}
