use crate::error::{Result, StatError};
use crate::stats::UNATTRIBUTED;
use serde::{Deserialize, Serialize};

/// Validated `(user, text)` pair consumed by the word counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub user_id: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), text: text.into() }
    }
}

/// Archived message as kept in the `content` tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub chat_id: String,
    pub from_id: Option<String>,
    pub text: Option<String>,
    pub caption: Option<String>,
}

impl StoredMessage {
    /// Whether the message carries a text body or a non-empty media caption.
    pub fn has_text(&self) -> bool {
        self.text.is_some() || self.caption.as_deref().map_or(false, |c| !c.is_empty())
    }

    pub fn into_chat_message(self) -> ChatMessage {
        let text = self.text.or(self.caption).unwrap_or_default();
        let user_id = self.from_id.unwrap_or_else(|| UNATTRIBUTED.to_string());
        ChatMessage { user_id, text }
    }
}

#[derive(Debug, Deserialize)]
pub struct Peer {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub print_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub caption: Option<String>,
}

/// One record of a message dump. Every field is optional.
#[derive(Debug, Deserialize)]
pub struct InputMessage {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub chat_id: Option<serde_json::Value>,
    #[serde(default)]
    pub from: Option<Peer>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub media: Option<Media>,
}

/// Import-ready form of an [`InputMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub message_id: Option<String>,
    pub message: StoredMessage,
    /// Sender id and display name, when the dump names the sender.
    pub sender: Option<(String, String)>,
}

impl InputMessage {
    /// Validates the record. `fallback_chat` fills records without a chat id.
    pub fn into_record(self, fallback_chat: Option<&str>) -> Result<ImportRecord> {
        let message_id = self.id.as_ref().map(id_string);
        let chat_id = match (self.chat_id.as_ref().map(id_string), fallback_chat) {
            (Some(id), _) => id,
            (None, Some(fallback)) => fallback.to_string(),
            (None, None) => {
                return Err(StatError::MissingChatId {
                    message_id: message_id.unwrap_or_else(|| "<unnamed>".to_string()),
                })
            }
        };
        let from_id = self.from.as_ref().and_then(|p| p.id.as_ref()).map(id_string);
        let sender = self.from.and_then(|p| match (p.id.as_ref().map(id_string), p.print_name) {
            (Some(id), Some(name)) => Some((id, name)),
            _ => None,
        });
        let caption = self.media.and_then(|m| m.caption);
        Ok(ImportRecord {
            message_id,
            message: StoredMessage { chat_id, from_id, text: self.text, caption },
            sender,
        })
    }
}

fn id_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
