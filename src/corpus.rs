//! Message corpus and its startup lifecycle
//!
//! The corpus is populated exactly once, before the server accepts requests,
//! and is read-only afterwards. Handlers share it through an `Arc`.

use crate::cache::MessageCache;
use crate::context::build_context;
use crate::fetcher::{fetch_all, MessageSource, PaginationConfig};
use crate::models::Message;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    messages: Vec<Message>,
}

impl Corpus {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Render the corpus as LLM grounding text.
    pub fn context(&self) -> String {
        build_context(&self.messages)
    }
}

impl From<Vec<Message>> for Corpus {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

/// Build the startup corpus: the cache if present, otherwise a full fetch.
///
/// Never fails. A failed fetch leaves the corpus empty and the server still
/// starts; a failed save is logged and the fetched corpus is kept.
pub async fn load_or_fetch(
    cache: &MessageCache,
    source: &dyn MessageSource,
    pagination: &PaginationConfig,
) -> Corpus {
    if let Some(messages) = cache.load().await {
        info!("Server started using cached data: {} messages", messages.len());
        return Corpus::new(messages);
    }

    info!("Cache not found or unreadable. Fetching messages (paginated)...");
    let messages = fetch_all(source, pagination).await;

    if let Err(e) = cache.save(&messages).await {
        warn!("Failed to write message cache {}: {}", cache.path().display(), e);
    }

    Corpus::new(messages)
}
