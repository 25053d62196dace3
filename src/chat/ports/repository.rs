//! Repository port for chat creation and lookup.

use super::StoreError;
use crate::chat::domain::{Chat, ChatCriteria, ChatDomainError, ChatDraft};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for chat repository operations.
pub type ChatRepositoryResult<T> = Result<T, ChatRepositoryError>;

/// Chat persistence contract.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Creates a chat and one membership record per participant atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::Empty`] for a blank draft or an empty
    /// participant list, [`ChatRepositoryError::Invalid`] for a malformed
    /// draft, and [`ChatRepositoryError::Internal`] or
    /// [`ChatRepositoryError::RollbackFailed`] when the transactional write
    /// fails.
    async fn create(&self, draft: ChatDraft) -> ChatRepositoryResult<Chat>;

    /// Finds the chat matching every populated criteria field.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::CannotFind`] when no field is
    /// populated and [`ChatRepositoryError::NotFound`] when nothing matches.
    async fn find(&self, criteria: ChatCriteria) -> ChatRepositoryResult<Chat>;

    /// Returns every chat owned by the user, soft-deleted ones included.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::Empty`] for a blank owner identifier.
    async fn find_owned_chats(&self, owner_id: &str) -> ChatRepositoryResult<Vec<Chat>>;

    /// Finds the personal chat between two users regardless of argument
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::Empty`] when either identifier is blank,
    /// [`ChatRepositoryError::Invalid`] when both name the same user, and
    /// [`ChatRepositoryError::NotFound`] when no such chat exists.
    async fn find_personal_chat_between_users(
        &self,
        owner_id: &str,
        participant_id: &str,
    ) -> ChatRepositoryResult<Chat>;
}

/// Errors returned by chat repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ChatRepositoryError {
    /// A required argument was blank.
    #[error("required argument is empty")]
    Empty,

    /// No record matched the lookup.
    #[error("not found")]
    NotFound,

    /// The criteria did not contain anything to search by.
    #[error("cannot find chat: no search criteria supplied")]
    CannotFind,

    /// The draft violated a chat invariant.
    #[error(transparent)]
    Invalid(ChatDomainError),

    /// Storage failure.
    #[error("internal error: {0}")]
    Internal(#[from] StoreError),

    /// A write failed and the rollback that followed also failed.
    #[error("rollback failed: {rollback}; original error: {cause}")]
    RollbackFailed {
        /// The failure that triggered the rollback.
        #[source]
        cause: StoreError,
        /// The failure raised by the rollback itself.
        rollback: StoreError,
    },

    /// The operation did not finish within the configured deadline.
    #[error("operation exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),
}

impl ChatRepositoryError {
    /// Reports whether the underlying storage failure is retryable.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Internal(err) | Self::RollbackFailed { cause: err, .. } => err.is_transient(),
            _ => false,
        }
    }
}

impl From<ChatDomainError> for ChatRepositoryError {
    fn from(err: ChatDomainError) -> Self {
        match err {
            ChatDomainError::MissingOwner => Self::Empty,
            other => Self::Invalid(other),
        }
    }
}
