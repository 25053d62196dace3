//! Error types for chat domain validation and parsing.

use crate::user::domain::UserId;
use thiserror::Error;

/// Errors returned while validating chat drafts and persisted values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatDomainError {
    /// The draft has no owner.
    #[error("chat owner is required")]
    MissingOwner,

    /// A participant identifier is blank.
    #[error("participant identifier at position {0} is empty")]
    EmptyParticipant(usize),

    /// The same user appears twice in the participant list.
    #[error("participant {0} is listed more than once")]
    DuplicateParticipant(UserId),

    /// A personal chat does not have exactly two participants.
    #[error("personal chat requires exactly two participants, found {0}")]
    PersonalParticipantCount(usize),

    /// A personal chat owner is not one of its participants.
    #[error("personal chat owner {0} is not a participant")]
    OwnerNotParticipant(UserId),

    /// A personal chat lookup names the same user twice.
    #[error("personal chat lookup needs two distinct users, got {0} twice")]
    SelfPersonalChat(UserId),

    /// The chat type string is not recognised.
    #[error("unknown chat type: {0}")]
    UnknownChatKind(String),

    /// The message type string is not recognised.
    #[error("unknown message type: {0}")]
    UnknownMessageKind(String),

    /// A membership window ends before it starts.
    #[error("membership window ends at {end} before it starts at {start}")]
    InvertedWindow {
        /// Window start in epoch milliseconds.
        start: i64,
        /// Window end in epoch milliseconds.
        end: i64,
    },

    /// A stored epoch-millisecond value is outside the representable range.
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}
