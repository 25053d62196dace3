//! In-memory integration tests for user account storage.

use super::helpers::users;
use chatstore::user::{
    adapters::{TracedUserRepository, memory::InMemoryUserRepository},
    domain::{User, UserCriteria},
    ports::{UserRepository, UserRepositoryError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_user_is_found_by_username_or_email(users: InMemoryUserRepository) {
    let created = users
        .create(User::new("ada", "ada@example.com").with_names("Ada", "Lovelace"))
        .await
        .expect("create user");

    let by_username = users
        .find(UserCriteria::new().with_username("ada"))
        .await
        .expect("find by username");
    let by_either = users
        .find(
            UserCriteria::new()
                .with_username("nobody")
                .with_email("ada@example.com"),
        )
        .await
        .expect("find by email");

    assert!(created.id().is_some());
    assert_eq!(by_username, created);
    assert_eq!(by_either, created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_and_existence_checks(users: InMemoryUserRepository) {
    let created = users
        .create(User::new("grace", "grace@example.com"))
        .await
        .expect("create user");
    let id = created.id().expect("assigned id").clone();
    let renamed = created.with_names("Grace", "Hopper");

    users.update(&renamed).await.expect("update user");
    let found = users
        .find(UserCriteria::new().with_id(id.clone()))
        .await
        .expect("find by id");

    assert_eq!(found.first_name(), "Grace");
    assert!(users.exists(id.as_str()).await.expect("exists"));
    assert!(users.exists_username("grace").await.expect("exists username"));
    assert!(!users.exists_username("linus").await.expect("missing username"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn traced_user_repository_maps_errors_unchanged(users: InMemoryUserRepository) {
    let traced = TracedUserRepository::new(users);

    let no_criteria = traced.find(UserCriteria::new()).await;
    let missing = traced
        .find(UserCriteria::new().with_email("ghost@example.com"))
        .await;
    let bad_email = traced.create(User::new("eve", "not-an-email")).await;

    assert!(matches!(no_criteria, Err(UserRepositoryError::CannotFind)));
    assert!(matches!(missing, Err(UserRepositoryError::NotFound)));
    assert!(matches!(bad_email, Err(UserRepositoryError::InvalidArgument(_))));
}
