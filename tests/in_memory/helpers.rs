//! Shared test helpers for in-memory repository integration tests.

use std::sync::Arc;

use chatstore::{
    chat::{
        adapters::memory::InMemoryChatStore,
        domain::{Chat, ChatDraft, ChatKind},
        ports::ChatRepository,
        services::ChatRepositoryService,
    },
    user::{adapters::memory::InMemoryUserRepository, domain::UserId},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Chat service wired to an in-memory store.
pub type TestChatService = ChatRepositoryService<InMemoryChatStore, DefaultClock>;

/// Provides a chat service over its own in-memory store.
#[fixture]
pub fn service() -> (InMemoryChatStore, TestChatService) {
    let backing = InMemoryChatStore::new();
    let chat_service = ChatRepositoryService::new(Arc::new(backing.clone()), Arc::new(DefaultClock));
    (backing, chat_service)
}

/// Provides a fresh in-memory user repository for each test.
#[fixture]
pub fn users() -> InMemoryUserRepository {
    InMemoryUserRepository::new()
}

/// Builds a user identifier from a non-blank literal.
#[must_use]
pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// Creates a group chat owned by `owner` with the given participants.
///
/// # Errors
///
/// Returns an error if the chat cannot be created.
pub async fn create_group(
    service: &TestChatService,
    owner: &str,
    participants: &[&str],
) -> Result<Chat, eyre::Report> {
    let draft = ChatDraft::new(ChatKind::Group, owner)
        .with_title(format!("{owner}'s group"))
        .with_participants(participants.iter().copied());
    Ok(service.create(draft).await?)
}

/// Creates a personal chat between `owner` and `other`.
///
/// # Errors
///
/// Returns an error if the chat cannot be created.
pub async fn create_personal(
    service: &TestChatService,
    owner: &str,
    other: &str,
) -> Result<Chat, eyre::Report> {
    let draft = ChatDraft::new(ChatKind::Personal, owner).with_participants([owner, other]);
    Ok(service.create(draft).await?)
}
