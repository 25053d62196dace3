//! Snapshot of the most recent message, embedded in a chat.
//!
//! Message storage lives outside this crate; chats only keep a denormalised
//! copy of their last message for list views.

use super::ChatDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type carried by a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text.
    #[default]
    Text,
    /// Image attachment.
    Image,
    /// Video attachment.
    Video,
    /// Document attachment.
    Document,
    /// Sticker image or document.
    Sticker,
}

impl MessageKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Document => "document",
            Self::Sticker => "sticker",
        }
    }
}

impl TryFrom<&str> for MessageKind {
    type Error = ChatDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "document" => Ok(Self::Document),
            "sticker" => Ok(Self::Sticker),
            _ => Err(ChatDomainError::UnknownMessageKind(value.to_owned())),
        }
    }
}

/// Denormalised copy of a chat's latest message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    /// Message identifier.
    pub id: String,
    /// Chat the message belongs to.
    pub chat_id: String,
    /// Sender user identifier.
    pub from_id: String,
    /// Send time.
    #[serde(rename = "create_date", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Content type.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Link to uploaded media, empty for text.
    #[serde(default)]
    pub media: String,
    /// Message text.
    #[serde(default)]
    pub body: String,
    /// Last edit time.
    #[serde(rename = "update_at", with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    /// Whether the recipient has seen the message.
    #[serde(default)]
    pub viewed: bool,
    /// Reaction attached to the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<String>,
}
