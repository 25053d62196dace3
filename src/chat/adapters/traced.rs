//! Structured-logging decorator for chat repositories.

use crate::chat::domain::{Chat, ChatCriteria, ChatDraft, ChatId, ChatMembership};
use crate::chat::ports::{ChatRepository, ChatRepositoryResult, MembershipRepository};
use crate::telemetry::observe;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

const CHATS: &str = "chat_repository";
const MEMBERSHIPS: &str = "membership_repository";

/// Wraps a repository and logs every call with its component, operation,
/// outcome, and duration.
#[derive(Debug, Clone)]
pub struct TracedChatRepository<R> {
    inner: R,
}

impl<R> TracedChatRepository<R> {
    /// Decorates `inner`.
    #[must_use]
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the decorated repository.
    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R> ChatRepository for TracedChatRepository<R>
where
    R: ChatRepository,
{
    async fn create(&self, draft: ChatDraft) -> ChatRepositoryResult<Chat> {
        observe(CHATS, "create", self.inner.create(draft)).await
    }

    async fn find(&self, criteria: ChatCriteria) -> ChatRepositoryResult<Chat> {
        observe(CHATS, "find", self.inner.find(criteria)).await
    }

    async fn find_owned_chats(&self, owner_id: &str) -> ChatRepositoryResult<Vec<Chat>> {
        observe(
            CHATS,
            "find_owned_chats",
            self.inner.find_owned_chats(owner_id),
        )
        .await
    }

    async fn find_personal_chat_between_users(
        &self,
        owner_id: &str,
        participant_id: &str,
    ) -> ChatRepositoryResult<Chat> {
        observe(
            CHATS,
            "find_personal_chat_between_users",
            self.inner
                .find_personal_chat_between_users(owner_id, participant_id),
        )
        .await
    }
}

#[async_trait]
impl<R> MembershipRepository for TracedChatRepository<R>
where
    R: MembershipRepository,
{
    async fn find_membership(
        &self,
        chat_id: ChatId,
        user_id: &str,
    ) -> ChatRepositoryResult<ChatMembership> {
        observe(
            MEMBERSHIPS,
            "find_membership",
            self.inner.find_membership(chat_id, user_id),
        )
        .await
    }

    async fn list_memberships(&self, chat_id: ChatId) -> ChatRepositoryResult<Vec<ChatMembership>> {
        observe(
            MEMBERSHIPS,
            "list_memberships",
            self.inner.list_memberships(chat_id),
        )
        .await
    }

    async fn mark_read(
        &self,
        chat_id: ChatId,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> ChatRepositoryResult<ChatMembership> {
        observe(
            MEMBERSHIPS,
            "mark_read",
            self.inner.mark_read(chat_id, user_id, at),
        )
        .await
    }

    async fn close_window(
        &self,
        chat_id: ChatId,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> ChatRepositoryResult<ChatMembership> {
        observe(
            MEMBERSHIPS,
            "close_window",
            self.inner.close_window(chat_id, user_id, at),
        )
        .await
    }

    async fn remove_membership(&self, chat_id: ChatId, user_id: &str) -> ChatRepositoryResult<()> {
        observe(
            MEMBERSHIPS,
            "remove_membership",
            self.inner.remove_membership(chat_id, user_id),
        )
        .await
    }
}
