//! Store-backed chat repository.

use super::{ChatRepositorySettings, TransactionCoordinator};
use crate::chat::domain::{
    Chat, ChatCriteria, ChatDraft, ChatFilter, ChatId, ChatMembership, materialize_memberships,
};
use crate::chat::ports::{
    ChatRepository, ChatRepositoryError, ChatRepositoryResult, ChatStore, MembershipRepository,
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Chat and membership repository over a [`ChatStore`].
///
/// Validates input before touching storage, stamps creation times from the
/// injected clock, and maps storage outcomes to [`ChatRepositoryError`].
pub struct ChatRepositoryService<S, C>
where
    S: ChatStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    coordinator: TransactionCoordinator<S>,
    operation_timeout: Option<Duration>,
}

impl<S, C> ChatRepositoryService<S, C>
where
    S: ChatStore,
    C: Clock + Send + Sync,
{
    /// Creates a repository with default settings.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_settings(store, clock, ChatRepositorySettings::default())
    }

    /// Creates a repository with explicit consistency and deadline settings.
    #[must_use]
    pub fn with_settings(store: Arc<S>, clock: Arc<C>, settings: ChatRepositorySettings) -> Self {
        let coordinator =
            TransactionCoordinator::new(Arc::clone(&store), settings.session, settings.transaction);
        Self {
            store,
            clock,
            coordinator,
            operation_timeout: settings.operation_timeout,
        }
    }

    /// Current time at the millisecond precision storage keeps.
    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(3)
    }

    async fn within_deadline<T, F>(&self, call: F) -> ChatRepositoryResult<T>
    where
        F: Future<Output = ChatRepositoryResult<T>> + Send,
    {
        match self.operation_timeout {
            None => call.await,
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(ChatRepositoryError::DeadlineExceeded(limit))),
        }
    }
}

fn required_user(raw: &str) -> ChatRepositoryResult<UserId> {
    UserId::new(raw).map_err(|_| ChatRepositoryError::Empty)
}

#[async_trait]
impl<S, C> ChatRepository for ChatRepositoryService<S, C>
where
    S: ChatStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn create(&self, draft: ChatDraft) -> ChatRepositoryResult<Chat> {
        let validated = draft.validate()?;
        self.within_deadline(async {
            let now = self.now();
            let chat = Chat::from_draft(validated, ChatId::new(), now);
            let memberships = materialize_memberships(chat.id(), chat.participants(), now);
            self.coordinator.persist(&chat, &memberships).await?;
            Ok(chat)
        })
        .await
    }

    async fn find(&self, criteria: ChatCriteria) -> ChatRepositoryResult<Chat> {
        let filter = criteria
            .into_filter()
            .ok_or(ChatRepositoryError::CannotFind)?;
        self.within_deadline(async {
            self.store
                .find_chat(&filter)
                .await?
                .ok_or(ChatRepositoryError::NotFound)
        })
        .await
    }

    async fn find_owned_chats(&self, owner_id: &str) -> ChatRepositoryResult<Vec<Chat>> {
        let filter = ChatFilter::owned_by(required_user(owner_id)?);
        self.within_deadline(async { Ok(self.store.find_chats(&filter).await?) })
            .await
    }

    async fn find_personal_chat_between_users(
        &self,
        owner_id: &str,
        participant_id: &str,
    ) -> ChatRepositoryResult<Chat> {
        let filter =
            ChatFilter::personal_between(required_user(owner_id)?, required_user(participant_id)?)?;
        self.within_deadline(async {
            self.store
                .find_chat(&filter)
                .await?
                .ok_or(ChatRepositoryError::NotFound)
        })
        .await
    }
}

#[async_trait]
impl<S, C> MembershipRepository for ChatRepositoryService<S, C>
where
    S: ChatStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn find_membership(
        &self,
        chat_id: ChatId,
        user_id: &str,
    ) -> ChatRepositoryResult<ChatMembership> {
        let member = required_user(user_id)?;
        self.within_deadline(async {
            self.store
                .find_membership(chat_id, &member)
                .await?
                .ok_or(ChatRepositoryError::NotFound)
        })
        .await
    }

    async fn list_memberships(&self, chat_id: ChatId) -> ChatRepositoryResult<Vec<ChatMembership>> {
        self.within_deadline(async { Ok(self.store.find_memberships(chat_id).await?) })
            .await
    }

    async fn mark_read(
        &self,
        chat_id: ChatId,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> ChatRepositoryResult<ChatMembership> {
        let member = required_user(user_id)?;
        let stamped = at.trunc_subsecs(3);
        self.within_deadline(async {
            self.store
                .advance_read_watermark(chat_id, &member, stamped)
                .await?
                .ok_or(ChatRepositoryError::NotFound)
        })
        .await
    }

    async fn close_window(
        &self,
        chat_id: ChatId,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> ChatRepositoryResult<ChatMembership> {
        let member = required_user(user_id)?;
        let stamped = at.trunc_subsecs(3);
        self.within_deadline(async {
            self.store
                .narrow_window(chat_id, &member, stamped)
                .await?
                .ok_or(ChatRepositoryError::NotFound)
        })
        .await
    }

    async fn remove_membership(&self, chat_id: ChatId, user_id: &str) -> ChatRepositoryResult<()> {
        let member = required_user(user_id)?;
        self.within_deadline(async {
            if self.store.delete_membership(chat_id, &member).await? {
                Ok(())
            } else {
                Err(ChatRepositoryError::NotFound)
            }
        })
        .await
    }
}
