//! In-memory integration tests for chat membership updates.

use super::helpers::{TestChatService, create_group, service};
use chatstore::chat::{
    adapters::memory::InMemoryChatStore,
    ports::{ChatRepositoryError, MembershipRepository},
};
use chrono::{Duration, SubsecRound};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn memberships_are_listed_in_participant_order(
    service: (InMemoryChatStore, TestChatService),
) {
    let (_, chats) = service;
    let chat = create_group(&chats, "alice", &["carol", "alice", "bob"])
        .await
        .expect("create chat");

    let members = chats.list_memberships(chat.id()).await.expect("list");
    let users: Vec<&str> = members.iter().map(|m| m.user_id().as_str()).collect();

    assert_eq!(users, vec!["carol", "alice", "bob"]);
    assert!(members.iter().all(|m| m.added_at() == chat.created_at()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn read_watermark_only_moves_forward(service: (InMemoryChatStore, TestChatService)) {
    let (_, chats) = service;
    let chat = create_group(&chats, "alice", &["alice", "bob"])
        .await
        .expect("create chat");
    let later = (chat.created_at() + Duration::minutes(5)).trunc_subsecs(3);

    let advanced = chats
        .mark_read(chat.id(), "bob", later)
        .await
        .expect("advance watermark");
    let unchanged = chats
        .mark_read(chat.id(), "bob", chat.created_at())
        .await
        .expect("stale watermark");

    assert_eq!(advanced.max_read_date(), later);
    assert_eq!(unchanged.max_read_date(), later);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closing_window_keeps_start_before_end(service: (InMemoryChatStore, TestChatService)) {
    let (_, chats) = service;
    let chat = create_group(&chats, "alice", &["alice", "bob"])
        .await
        .expect("create chat");
    let before_join = chat.created_at() - Duration::days(1);

    let closed = chats
        .close_window(chat.id(), "bob", before_join)
        .await
        .expect("close window");

    assert_eq!(closed.window().start(), chat.created_at());
    assert_eq!(closed.window().end(), chat.created_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_member_is_no_longer_found(service: (InMemoryChatStore, TestChatService)) {
    let (backing, chats) = service;
    let chat = create_group(&chats, "alice", &["alice", "bob"])
        .await
        .expect("create chat");

    chats
        .remove_membership(chat.id(), "bob")
        .await
        .expect("remove membership");
    let lookup = chats.find_membership(chat.id(), "bob").await;
    let second_removal = chats.remove_membership(chat.id(), "bob").await;

    assert!(matches!(lookup, Err(ChatRepositoryError::NotFound)));
    assert!(matches!(second_removal, Err(ChatRepositoryError::NotFound)));
    assert_eq!(backing.memberships().expect("memberships").len(), 1);
}
