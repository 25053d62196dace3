//! Storage seam for chats and memberships.
//!
//! Adapters classify backend faults into [`StoreError`] once; nothing above
//! this port inspects driver errors.

use crate::chat::domain::{Chat, ChatFilter, ChatId, ChatMembership};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

type BoxedError = Arc<dyn std::error::Error + Send + Sync>;

/// Storage faults, classified at the adapter boundary.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("duplicate key: {0}")]
    DuplicateKey(BoxedError),

    /// The backend labelled the failure as safe to retry.
    #[error("transient storage error: {0}")]
    Transient(BoxedError),

    /// The commit may or may not have been applied.
    #[error("commit outcome unknown: {0}")]
    CommitOutcomeUnknown(BoxedError),

    /// Iterating a result set failed after the query was accepted.
    #[error("cursor error: {0}")]
    Cursor(BoxedError),

    /// A stored document could not be mapped to the domain model.
    #[error("malformed stored document: {0}")]
    Decode(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(BoxedError),
}

impl StoreError {
    /// Wraps a backend failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }

    /// Wraps a failure raised while iterating a cursor.
    pub fn cursor(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Cursor(Arc::new(err))
    }

    /// Reports whether the backend marked the failure as retryable.
    ///
    /// Nothing in this crate retries; callers may use this to apply their
    /// own policy.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Read concern level applied to sessions and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadConcernLevel {
    /// Reads the node's most recent data.
    #[default]
    Local,
    /// Reads data acknowledged by a majority of the replica set.
    Majority,
    /// Reads from a point-in-time snapshot.
    Snapshot,
}

/// Write acknowledgement required before a commit returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteAcknowledgement {
    /// A majority of voting members must acknowledge.
    #[default]
    Majority,
    /// The given number of nodes must acknowledge.
    Nodes(u32),
}

/// Options for opening a storage session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSettings {
    /// Read concern for reads inside the session.
    pub read_concern: ReadConcernLevel,
}

/// Options for a multi-document transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionSettings {
    /// Read concern inside the transaction.
    pub read_concern: ReadConcernLevel,
    /// Write concern applied at commit.
    pub write_concern: WriteAcknowledgement,
    /// Upper bound on server-side commit time.
    pub max_commit_time: Option<Duration>,
}

/// Chat and membership storage.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Opens a session for a transactional write.
    ///
    /// The session is released when the returned value is dropped, aborting
    /// any transaction still open on it.
    async fn start_session(
        &self,
        settings: &SessionSettings,
    ) -> StoreResult<Box<dyn ChatStoreSession>>;

    /// Returns the first chat matching the filter.
    async fn find_chat(&self, filter: &ChatFilter) -> StoreResult<Option<Chat>>;

    /// Returns every chat matching the filter in storage order.
    async fn find_chats(&self, filter: &ChatFilter) -> StoreResult<Vec<Chat>>;

    /// Returns the membership of `user_id` in `chat_id`.
    async fn find_membership(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
    ) -> StoreResult<Option<ChatMembership>>;

    /// Returns every membership of a chat in storage order.
    async fn find_memberships(&self, chat_id: ChatId) -> StoreResult<Vec<ChatMembership>>;

    /// Raises the read watermark to `at` unless it is already later.
    ///
    /// Returns the stored membership after the update, or `None` when no
    /// membership exists.
    async fn advance_read_watermark(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<ChatMembership>>;

    /// Closes the membership window at `at`.
    ///
    /// Returns the stored membership after the update, or `None` when no
    /// membership exists.
    async fn narrow_window(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<ChatMembership>>;

    /// Deletes a membership. Returns whether a record was removed.
    async fn delete_membership(&self, chat_id: ChatId, user_id: &UserId) -> StoreResult<bool>;
}

/// An open storage session.
///
/// Writes issued after [`ChatStoreSession::start_transaction`] are invisible
/// to other readers until [`ChatStoreSession::commit_transaction`] succeeds.
#[async_trait]
pub trait ChatStoreSession: Send {
    /// Starts a transaction on this session.
    async fn start_transaction(&mut self, settings: &TransactionSettings) -> StoreResult<()>;

    /// Inserts a chat document inside the open transaction.
    async fn insert_chat(&mut self, chat: &Chat) -> StoreResult<()>;

    /// Inserts membership documents inside the open transaction.
    async fn insert_memberships(&mut self, memberships: &[ChatMembership]) -> StoreResult<()>;

    /// Commits the open transaction.
    async fn commit_transaction(&mut self) -> StoreResult<()>;

    /// Aborts the open transaction, discarding its writes.
    async fn abort_transaction(&mut self) -> StoreResult<()>;
}
