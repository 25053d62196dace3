//! Repository port for per-participant membership records.

use super::ChatRepositoryResult;
use crate::chat::domain::{ChatId, ChatMembership};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Membership lookup and maintenance outside the creation transaction.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Returns the membership of a user in a chat.
    ///
    /// # Errors
    ///
    /// Returns [`super::ChatRepositoryError::Empty`] for a blank user
    /// identifier and [`super::ChatRepositoryError::NotFound`] when the user
    /// is not a member.
    async fn find_membership(
        &self,
        chat_id: ChatId,
        user_id: &str,
    ) -> ChatRepositoryResult<ChatMembership>;

    /// Returns every membership of a chat.
    async fn list_memberships(&self, chat_id: ChatId) -> ChatRepositoryResult<Vec<ChatMembership>>;

    /// Advances the read watermark; never moves it backwards.
    ///
    /// # Errors
    ///
    /// Returns [`super::ChatRepositoryError::NotFound`] when the user is not
    /// a member.
    async fn mark_read(
        &self,
        chat_id: ChatId,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> ChatRepositoryResult<ChatMembership>;

    /// Stops new messages after `at` from becoming visible to the member.
    ///
    /// # Errors
    ///
    /// Returns [`super::ChatRepositoryError::NotFound`] when the user is not
    /// a member.
    async fn close_window(
        &self,
        chat_id: ChatId,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> ChatRepositoryResult<ChatMembership>;

    /// Deletes the membership of a departing participant.
    ///
    /// # Errors
    ///
    /// Returns [`super::ChatRepositoryError::NotFound`] when the user is not
    /// a member.
    async fn remove_membership(&self, chat_id: ChatId, user_id: &str) -> ChatRepositoryResult<()>;
}
