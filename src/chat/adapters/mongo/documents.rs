//! Wire documents for the `chat` and `chats_users` collections.

use crate::chat::domain::{
    Chat, ChatDomainError, ChatId, ChatKind, ChatMembership, MembershipId, MessageSnapshot,
    PersistedChatData, PersistedMembershipData,
};
use crate::chat::ports::StoreError;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct ChatDocument {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub create_date: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub deleted: bool,
    pub owner_id: String,
    #[serde(default)]
    pub unread: i64,
    #[serde(default)]
    pub pinned_messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<MessageSnapshot>,
}

impl ChatDocument {
    pub const COLLECTION: &'static str = crate::database::CHAT_COLLECTION;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct MembershipDocument {
    pub id: String,
    pub chat_id: String,
    pub user_id: String,
    pub added_at: i64,
    pub start_message_id: i64,
    pub end_message_id: i64,
    pub max_read_date: i64,
}

impl MembershipDocument {
    pub const COLLECTION: &'static str = crate::database::CHATS_USERS_COLLECTION;
}

impl From<&Chat> for ChatDocument {
    fn from(chat: &Chat) -> Self {
        Self {
            id: chat.id().to_string(),
            title: chat.title().to_owned(),
            create_date: chat.created_at().timestamp_millis(),
            kind: chat.kind(),
            participants: chat
                .participants()
                .iter()
                .map(|user| user.as_str().to_owned())
                .collect(),
            deleted: chat.is_deleted(),
            owner_id: chat.owner_id().as_str().to_owned(),
            unread: i64::try_from(chat.unread()).unwrap_or(i64::MAX),
            pinned_messages: chat.pinned_message_ids().to_vec(),
            label: chat.label().map(str::to_owned),
            pinned_message_id: chat.pinned_message_id().map(str::to_owned),
            last_message: chat.last_message().cloned(),
        }
    }
}

impl TryFrom<ChatDocument> for Chat {
    type Error = StoreError;

    fn try_from(doc: ChatDocument) -> Result<Self, Self::Error> {
        let participants = doc
            .participants
            .into_iter()
            .map(user_id)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_persisted(PersistedChatData {
            id: ChatId::from_uuid(uuid(&doc.id)?),
            title: doc.title,
            created_at: from_millis(doc.create_date)?,
            kind: doc.kind,
            participants,
            deleted: doc.deleted,
            owner_id: user_id(doc.owner_id)?,
            unread: u64::try_from(doc.unread).unwrap_or(0),
            pinned_message_ids: doc.pinned_messages,
            pinned_message_id: doc.pinned_message_id,
            label: doc.label,
            last_message: doc.last_message,
        }))
    }
}

impl From<&ChatMembership> for MembershipDocument {
    fn from(member: &ChatMembership) -> Self {
        let window = member.window();
        Self {
            id: member.id().to_string(),
            chat_id: member.chat_id().to_string(),
            user_id: member.user_id().as_str().to_owned(),
            added_at: member.added_at().timestamp_millis(),
            start_message_id: window.start().timestamp_millis(),
            end_message_id: window.end().timestamp_millis(),
            max_read_date: member.max_read_date().timestamp_millis(),
        }
    }
}

impl TryFrom<MembershipDocument> for ChatMembership {
    type Error = StoreError;

    fn try_from(doc: MembershipDocument) -> Result<Self, Self::Error> {
        Self::from_persisted(PersistedMembershipData {
            id: MembershipId::from_uuid(uuid(&doc.id)?),
            chat_id: ChatId::from_uuid(uuid(&doc.chat_id)?),
            user_id: user_id(doc.user_id)?,
            added_at: from_millis(doc.added_at)?,
            start: from_millis(doc.start_message_id)?,
            end: from_millis(doc.end_message_id)?,
            max_read_date: from_millis(doc.max_read_date)?,
        })
        .map_err(decode)
    }
}

fn decode(err: impl std::fmt::Display) -> StoreError {
    StoreError::Decode(err.to_string())
}

fn uuid(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(decode)
}

fn user_id(raw: String) -> Result<UserId, StoreError> {
    UserId::new(raw).map_err(decode)
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| decode(ChatDomainError::TimestampOutOfRange(millis)))
}
