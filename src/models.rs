//! Core data models for the chat analyst

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Placeholder used when a remote record carries no author.
pub const UNKNOWN_MEMBER: &str = "Unknown";

//
// ================= Message =================
//

/// A single cached chat message, in the shape persisted to the cache file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub member: String,
    pub message: String,
}

impl Message {
    pub fn new(member: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            message: message.into(),
        }
    }
}

//
// ================= Remote Wire Types =================
//

/// One record as returned by the remote message API.
///
/// Fields are kept as raw JSON so that a record with an unexpected field type
/// still yields a message instead of failing the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteItem {
    #[serde(default)]
    pub user_name: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

impl RemoteItem {
    pub fn new(user_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_name: Some(serde_json::Value::String(user_name.into())),
            message: Some(serde_json::Value::String(message.into())),
        }
    }

    /// Normalize into a [`Message`], filling in placeholders for missing fields.
    pub fn normalize(self) -> Message {
        Message {
            member: render_field(self.user_name).unwrap_or_else(|| UNKNOWN_MEMBER.to_string()),
            message: render_field(self.message).unwrap_or_default(),
        }
    }
}

/// Strings pass through as-is, other values are rendered as JSON text.
/// Null counts as missing.
fn render_field(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// One page of the remote message API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemotePage {
    #[serde(default)]
    items: Option<Vec<RemoteItem>>,
    #[serde(default)]
    total: Option<serde_json::Value>,
}

impl RemotePage {
    pub fn new(items: Vec<RemoteItem>, total: Option<u64>) -> Self {
        Self {
            items: Some(items),
            total: total.map(serde_json::Value::from),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.as_ref().map_or(true, Vec::is_empty)
    }

    /// Whether the page carries a non-null `total` field, usable or not.
    pub fn has_total(&self) -> bool {
        !matches!(self.total, None | Some(serde_json::Value::Null))
    }

    /// The advertised total, if it is a non-negative integer.
    pub fn total(&self) -> Option<u64> {
        match &self.total {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => {
                let parsed = value.as_u64();
                if parsed.is_none() {
                    warn!("Ignoring non-integer total from message API: {}", value);
                }
                parsed
            }
        }
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .map(RemoteItem::normalize)
            .collect()
    }
}
