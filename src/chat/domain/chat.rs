//! Chat aggregate root and chat type.

use super::{ChatDomainError, ChatId, MessageSnapshot, ValidatedDraft};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    /// One-to-one conversation; the default.
    #[default]
    Personal,
    /// Multi-participant conversation.
    Group,
    /// Chat kept for archival.
    Archive,
}

impl ChatKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Group => "group",
            Self::Archive => "archive",
        }
    }
}

impl TryFrom<&str> for ChatKind {
    type Error = ChatDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "group" => Ok(Self::Group),
            "archive" => Ok(Self::Archive),
            _ => Err(ChatDomainError::UnknownChatKind(value.to_owned())),
        }
    }
}

/// Chat aggregate root.
///
/// Created once through the transactional creation path; never physically
/// removed by this crate (see [`Chat::is_deleted`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    id: ChatId,
    title: String,
    created_at: DateTime<Utc>,
    kind: ChatKind,
    participants: Vec<UserId>,
    deleted: bool,
    owner_id: UserId,
    unread: u64,
    pinned_message_ids: Vec<String>,
    pinned_message_id: Option<String>,
    label: Option<String>,
    last_message: Option<MessageSnapshot>,
}

/// Parameter object for reconstructing a persisted chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChatData {
    /// Persisted chat identifier.
    pub id: ChatId,
    /// Persisted title.
    pub title: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted chat type.
    pub kind: ChatKind,
    /// Persisted participant list, in stored order.
    pub participants: Vec<UserId>,
    /// Persisted soft-delete flag.
    pub deleted: bool,
    /// Persisted owner.
    pub owner_id: UserId,
    /// Persisted unread counter.
    pub unread: u64,
    /// Persisted pinned message references.
    pub pinned_message_ids: Vec<String>,
    /// Persisted primary pinned message, if any.
    pub pinned_message_id: Option<String>,
    /// Persisted label, if any.
    pub label: Option<String>,
    /// Persisted last-message snapshot, if any.
    pub last_message: Option<MessageSnapshot>,
}

impl Chat {
    /// Creates a new chat from a validated draft.
    #[must_use]
    pub fn from_draft(draft: ValidatedDraft, id: ChatId, created_at: DateTime<Utc>) -> Self {
        let ValidatedDraft {
            title,
            kind,
            owner_id,
            participants,
            label,
            pinned_message_ids,
            pinned_message_id,
        } = draft;

        Self {
            id,
            title,
            created_at,
            kind,
            participants,
            deleted: false,
            owner_id,
            unread: 0,
            pinned_message_ids,
            pinned_message_id,
            label,
            last_message: None,
        }
    }

    /// Reconstructs a chat from persisted storage data.
    #[must_use]
    pub fn from_persisted(data: PersistedChatData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            created_at: data.created_at,
            kind: data.kind,
            participants: data.participants,
            deleted: data.deleted,
            owner_id: data.owner_id,
            unread: data.unread,
            pinned_message_ids: data.pinned_message_ids,
            pinned_message_id: data.pinned_message_id,
            label: data.label,
            last_message: data.last_message,
        }
    }

    /// Returns the chat identifier.
    #[must_use]
    pub const fn id(&self) -> ChatId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the server-assigned creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the chat type.
    #[must_use]
    pub const fn kind(&self) -> ChatKind {
        self.kind
    }

    /// Returns participant identifiers in stored order.
    #[must_use]
    pub fn participants(&self) -> &[UserId] {
        &self.participants
    }

    /// Returns whether the user participates in this chat.
    #[must_use]
    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participants.contains(user_id)
    }

    /// Returns whether the chat has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns the owner identifier.
    #[must_use]
    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Returns the unread counter.
    #[must_use]
    pub const fn unread(&self) -> u64 {
        self.unread
    }

    /// Returns pinned message references.
    #[must_use]
    pub fn pinned_message_ids(&self) -> &[String] {
        &self.pinned_message_ids
    }

    /// Returns the primary pinned message, if any.
    #[must_use]
    pub fn pinned_message_id(&self) -> Option<&str> {
        self.pinned_message_id.as_deref()
    }

    /// Returns the label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the last-message snapshot, if any.
    #[must_use]
    pub const fn last_message(&self) -> Option<&MessageSnapshot> {
        self.last_message.as_ref()
    }
}
