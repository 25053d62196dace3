//! Thread-safe in-memory [`ChatStore`] with transactional sessions.
//!
//! Session writes are staged and only become visible on commit. Unique
//! constraints mirror the document store indexes: one chat per id and one
//! membership per (chat, user) pair.

use crate::chat::{
    domain::{Chat, ChatFilter, ChatId, ChatMembership},
    ports::{ChatStore, ChatStoreSession, SessionSettings, StoreError, StoreResult, TransactionSettings},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Step at which an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreFault {
    /// Opening a session.
    StartSession,
    /// Starting a transaction.
    StartTransaction,
    /// Inserting the chat document.
    InsertChat,
    /// Inserting membership documents.
    InsertMemberships,
    /// Committing.
    Commit,
    /// Aborting.
    Abort,
    /// Any read query.
    Query,
}

/// Thread-safe in-memory chat store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatStore {
    state: Arc<RwLock<InMemoryChatState>>,
    open_sessions: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct InMemoryChatState {
    chats: Vec<Chat>,
    memberships: Vec<ChatMembership>,
    faults: HashSet<StoreFault>,
    session_starts: usize,
}

impl InMemoryChatState {
    fn check(&self, fault: StoreFault) -> StoreResult<()> {
        if self.faults.contains(&fault) {
            return Err(StoreError::backend(std::io::Error::other(format!(
                "injected {fault:?} failure"
            ))));
        }
        Ok(())
    }

    fn find_membership_mut(
        &mut self,
        chat_id: ChatId,
        user_id: &UserId,
    ) -> Option<&mut ChatMembership> {
        self.memberships
            .iter_mut()
            .find(|member| member.chat_id() == chat_id && member.user_id() == user_id)
    }
}

fn poisoned(err: impl std::fmt::Display) -> StoreError {
    StoreError::backend(std::io::Error::other(err.to_string()))
}

fn duplicate(what: String) -> StoreError {
    StoreError::DuplicateKey(Arc::new(std::io::Error::other(what)))
}

impl InMemoryChatStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, InMemoryChatState>> {
        self.state.read().map_err(poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, InMemoryChatState>> {
        self.state.write().map_err(poisoned)
    }

    /// Makes every subsequent `fault` step fail until cleared.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn fail_on(&self, fault: StoreFault) -> StoreResult<()> {
        self.write()?.faults.insert(fault);
        Ok(())
    }

    /// Removes every injected failure.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn clear_faults(&self) -> StoreResult<()> {
        self.write()?.faults.clear();
        Ok(())
    }

    /// Stores a chat directly, bypassing sessions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] when the chat id is taken.
    pub fn seed_chat(&self, chat: Chat) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.chats.iter().any(|stored| stored.id() == chat.id()) {
            return Err(duplicate(format!("chat {}", chat.id())));
        }
        state.chats.push(chat);
        Ok(())
    }

    /// Returns committed chats in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn chats(&self) -> StoreResult<Vec<Chat>> {
        Ok(self.read()?.chats.clone())
    }

    /// Returns committed memberships in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn memberships(&self) -> StoreResult<Vec<ChatMembership>> {
        Ok(self.read()?.memberships.clone())
    }

    /// Number of sessions opened since the store was created.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn session_starts(&self) -> StoreResult<usize> {
        Ok(self.read()?.session_starts)
    }

    /// Number of sessions not yet released.
    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn start_session(
        &self,
        _settings: &SessionSettings,
    ) -> StoreResult<Box<dyn ChatStoreSession>> {
        let mut state = self.write()?;
        state.check(StoreFault::StartSession)?;
        state.session_starts += 1;
        Ok(Box::new(InMemorySession {
            state: Arc::clone(&self.state),
            staged: None,
            _lease: SessionLease::acquire(Arc::clone(&self.open_sessions)),
        }))
    }

    async fn find_chat(&self, filter: &ChatFilter) -> StoreResult<Option<Chat>> {
        let state = self.read()?;
        state.check(StoreFault::Query)?;
        Ok(state.chats.iter().find(|chat| filter.matches(chat)).cloned())
    }

    async fn find_chats(&self, filter: &ChatFilter) -> StoreResult<Vec<Chat>> {
        let state = self.read()?;
        state.check(StoreFault::Query)?;
        Ok(state
            .chats
            .iter()
            .filter(|chat| filter.matches(chat))
            .cloned()
            .collect())
    }

    async fn find_membership(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
    ) -> StoreResult<Option<ChatMembership>> {
        let state = self.read()?;
        state.check(StoreFault::Query)?;
        Ok(state
            .memberships
            .iter()
            .find(|member| member.chat_id() == chat_id && member.user_id() == user_id)
            .cloned())
    }

    async fn find_memberships(&self, chat_id: ChatId) -> StoreResult<Vec<ChatMembership>> {
        let state = self.read()?;
        state.check(StoreFault::Query)?;
        Ok(state
            .memberships
            .iter()
            .filter(|member| member.chat_id() == chat_id)
            .cloned()
            .collect())
    }

    async fn advance_read_watermark(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<ChatMembership>> {
        let mut state = self.write()?;
        state.check(StoreFault::Query)?;
        Ok(state.find_membership_mut(chat_id, user_id).map(|member| {
            member.mark_read(at);
            member.clone()
        }))
    }

    async fn narrow_window(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<ChatMembership>> {
        let mut state = self.write()?;
        state.check(StoreFault::Query)?;
        Ok(state.find_membership_mut(chat_id, user_id).map(|member| {
            member.close_window(at);
            member.clone()
        }))
    }

    async fn delete_membership(&self, chat_id: ChatId, user_id: &UserId) -> StoreResult<bool> {
        let mut state = self.write()?;
        state.check(StoreFault::Query)?;
        let before = state.memberships.len();
        state
            .memberships
            .retain(|member| !(member.chat_id() == chat_id && member.user_id() == user_id));
        Ok(state.memberships.len() < before)
    }
}

/// Counts a session as open until dropped.
#[derive(Debug)]
struct SessionLease(Arc<AtomicUsize>);

impl SessionLease {
    fn acquire(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
struct StagedWrites {
    chats: Vec<Chat>,
    memberships: Vec<ChatMembership>,
}

#[derive(Debug)]
struct InMemorySession {
    state: Arc<RwLock<InMemoryChatState>>,
    staged: Option<StagedWrites>,
    _lease: SessionLease,
}

impl InMemorySession {
    fn read(&self) -> StoreResult<RwLockReadGuard<'_, InMemoryChatState>> {
        self.state.read().map_err(poisoned)
    }

    fn staged(&mut self) -> StoreResult<&mut StagedWrites> {
        self.staged
            .as_mut()
            .ok_or_else(|| StoreError::backend(std::io::Error::other("no transaction started")))
    }
}

fn chat_conflict(committed: &[Chat], staged: &[Chat], chat: &Chat) -> bool {
    committed
        .iter()
        .chain(staged)
        .any(|stored| stored.id() == chat.id())
}

fn membership_conflict(
    committed: &[ChatMembership],
    staged: &[ChatMembership],
    member: &ChatMembership,
) -> bool {
    committed.iter().chain(staged).any(|stored| {
        stored.id() == member.id()
            || (stored.chat_id() == member.chat_id() && stored.user_id() == member.user_id())
    })
}

#[async_trait]
impl ChatStoreSession for InMemorySession {
    async fn start_transaction(&mut self, _settings: &TransactionSettings) -> StoreResult<()> {
        self.read()?.check(StoreFault::StartTransaction)?;
        self.staged = Some(StagedWrites::default());
        Ok(())
    }

    async fn insert_chat(&mut self, chat: &Chat) -> StoreResult<()> {
        let state = Arc::clone(&self.state);
        let guard = state.read().map_err(poisoned)?;
        guard.check(StoreFault::InsertChat)?;
        let staged = self.staged()?;
        if chat_conflict(&guard.chats, &staged.chats, chat) {
            return Err(duplicate(format!("chat {}", chat.id())));
        }
        staged.chats.push(chat.clone());
        Ok(())
    }

    async fn insert_memberships(&mut self, memberships: &[ChatMembership]) -> StoreResult<()> {
        let state = Arc::clone(&self.state);
        let guard = state.read().map_err(poisoned)?;
        guard.check(StoreFault::InsertMemberships)?;
        let staged = self.staged()?;
        for member in memberships {
            if membership_conflict(&guard.memberships, &staged.memberships, member) {
                return Err(duplicate(format!(
                    "membership of {} in chat {}",
                    member.user_id(),
                    member.chat_id()
                )));
            }
            staged.memberships.push(member.clone());
        }
        Ok(())
    }

    async fn commit_transaction(&mut self) -> StoreResult<()> {
        let state = Arc::clone(&self.state);
        let mut guard = state.write().map_err(poisoned)?;
        guard.check(StoreFault::Commit)?;
        let staged = self
            .staged
            .take()
            .ok_or_else(|| StoreError::backend(std::io::Error::other("no transaction started")))?;
        guard.chats.extend(staged.chats);
        guard.memberships.extend(staged.memberships);
        Ok(())
    }

    async fn abort_transaction(&mut self) -> StoreResult<()> {
        let outcome = self.read()?.check(StoreFault::Abort);
        self.staged = None;
        outcome
    }
}
