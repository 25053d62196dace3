//! Atomic creation of a chat together with its memberships.

use crate::chat::domain::{Chat, ChatMembership};
use crate::chat::ports::{
    ChatRepositoryError, ChatRepositoryResult, ChatStore, SessionSettings, TransactionSettings,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Writes a chat and its membership batch in one transaction.
///
/// Each call opens its own session and releases it before returning, on
/// success and on every failure path. Failures are not retried.
pub struct TransactionCoordinator<S>
where
    S: ChatStore,
{
    store: Arc<S>,
    session: SessionSettings,
    transaction: TransactionSettings,
}

impl<S> TransactionCoordinator<S>
where
    S: ChatStore,
{
    /// Creates a coordinator over `store`.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        session: SessionSettings,
        transaction: TransactionSettings,
    ) -> Self {
        Self {
            store,
            session,
            transaction,
        }
    }

    /// Inserts `chat` and `memberships`, committing both or neither.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::Empty`] without opening a session when
    /// `memberships` is empty. A failed insert or commit is rolled back and
    /// returned as [`ChatRepositoryError::Internal`]; when the rollback also
    /// fails the result is [`ChatRepositoryError::RollbackFailed`] carrying
    /// both errors.
    pub async fn persist(
        &self,
        chat: &Chat,
        memberships: &[ChatMembership],
    ) -> ChatRepositoryResult<()> {
        if memberships.is_empty() {
            return Err(ChatRepositoryError::Empty);
        }

        let chat_id = chat.id();
        let mut session = self.store.start_session(&self.session).await?;
        session.start_transaction(&self.transaction).await?;
        debug!(%chat_id, memberships = memberships.len(), "transaction started");

        let written = async {
            session.insert_chat(chat).await?;
            debug!(%chat_id, "chat inserted");
            session.insert_memberships(memberships).await?;
            debug!(%chat_id, "memberships inserted");
            session.commit_transaction().await
        }
        .await;

        let Err(cause) = written else {
            debug!(%chat_id, "transaction committed");
            return Ok(());
        };

        warn!(%chat_id, error = %cause, "aborting chat creation");
        match session.abort_transaction().await {
            Ok(()) => Err(ChatRepositoryError::Internal(cause)),
            Err(rollback) => {
                error!(
                    %chat_id,
                    error = %cause,
                    rollback_error = %rollback,
                    "rollback failed; storage may hold a partial write"
                );
                Err(ChatRepositoryError::RollbackFailed { cause, rollback })
            }
        }
    }
}
