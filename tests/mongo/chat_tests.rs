//! `MongoDB` integration tests for transactional chat creation.

use super::helpers::TestDatabase;
use chatstore::chat::{
    domain::{ChatCriteria, ChatDraft, ChatKind},
    ports::{ChatRepository, ChatRepositoryError, ChatStore, MembershipRepository},
};
use chrono::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn chat_and_memberships_are_committed_together() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::connect().await? else {
        return Ok(());
    };
    let (_, service) = db.chat_service().await?;

    let created = service
        .create(
            ChatDraft::new(ChatKind::Group, "u1")
                .with_title("standup")
                .with_participants(["u1", "u2", "u3"]),
        )
        .await?;
    let found = service.find(ChatCriteria::new().with_id(created.id())).await?;
    let members = service.list_memberships(created.id()).await?;

    eyre::ensure!(found == created, "stored chat differs from created chat");
    eyre::ensure!(members.len() == 3, "expected 3 memberships");
    eyre::ensure!(
        members
            .iter()
            .all(|member| member.window().start() == created.created_at()),
        "membership windows must open at creation time"
    );
    db.cleanup().await
}

#[tokio::test(flavor = "multi_thread")]
async fn personal_chat_lookup_is_symmetric() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::connect().await? else {
        return Ok(());
    };
    let (_, service) = db.chat_service().await?;

    let created = service
        .create(ChatDraft::new(ChatKind::Personal, "u1").with_participants(["u1", "u2"]))
        .await?;
    let forward = service.find_personal_chat_between_users("u1", "u2").await?;
    let reverse = service.find_personal_chat_between_users("u2", "u1").await?;
    let stranger = service.find_personal_chat_between_users("u1", "u9").await;

    eyre::ensure!(forward == created && reverse == created, "lookup mismatch");
    eyre::ensure!(
        matches!(stranger, Err(ChatRepositoryError::NotFound)),
        "unexpected result for stranger: {stranger:?}"
    );
    db.cleanup().await
}

#[tokio::test(flavor = "multi_thread")]
async fn owned_chats_are_listed_once_each() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::connect().await? else {
        return Ok(());
    };
    let (_, service) = db.chat_service().await?;
    for index in 0..3 {
        service
            .create(
                ChatDraft::new(ChatKind::Group, "owner")
                    .with_title(format!("chat {index}"))
                    .with_participants(["owner", "guest"]),
            )
            .await?;
    }

    let first = service.find_owned_chats("owner").await?;
    let second = service.find_owned_chats("owner").await?;

    eyre::ensure!(first.len() == 3, "expected 3 chats, found {}", first.len());
    eyre::ensure!(first == second, "repeated listing changed");
    db.cleanup().await
}

#[tokio::test(flavor = "multi_thread")]
async fn membership_updates_respect_invariants() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::connect().await? else {
        return Ok(());
    };
    let (store, service) = db.chat_service().await?;
    let chat = service
        .create(ChatDraft::new(ChatKind::Group, "u1").with_participants(["u1", "u2"]))
        .await?;
    let later = chat.created_at() + Duration::hours(1);

    service.mark_read(chat.id(), "u2", later).await?;
    let stale = service.mark_read(chat.id(), "u2", chat.created_at()).await?;
    let closed = service
        .close_window(chat.id(), "u2", chat.created_at() - Duration::days(1))
        .await?;
    service.remove_membership(chat.id(), "u1").await?;
    let remaining = store.find_memberships(chat.id()).await?;

    eyre::ensure!(stale.max_read_date() == later, "read watermark moved backwards");
    eyre::ensure!(
        closed.window().end() == closed.window().start(),
        "window end fell before its start"
    );
    eyre::ensure!(remaining.len() == 1, "expected one remaining membership");
    db.cleanup().await
}
