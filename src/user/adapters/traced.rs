//! Structured-logging decorator for user repositories.

use crate::telemetry::observe;
use crate::user::domain::{User, UserCriteria};
use crate::user::ports::{UserRepository, UserRepositoryResult};
use async_trait::async_trait;

const COMPONENT: &str = "user_repository";

/// Wraps a user repository and logs every call with its outcome and
/// duration.
#[derive(Debug, Clone)]
pub struct TracedUserRepository<R> {
    inner: R,
}

impl<R> TracedUserRepository<R> {
    /// Decorates `inner`.
    #[must_use]
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R> UserRepository for TracedUserRepository<R>
where
    R: UserRepository,
{
    async fn create(&self, user: User) -> UserRepositoryResult<User> {
        observe(COMPONENT, "create", self.inner.create(user)).await
    }

    async fn find(&self, criteria: UserCriteria) -> UserRepositoryResult<User> {
        observe(COMPONENT, "find", self.inner.find(criteria)).await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        observe(COMPONENT, "update", self.inner.update(user)).await
    }

    async fn exists(&self, id: &str) -> UserRepositoryResult<bool> {
        observe(COMPONENT, "exists", self.inner.exists(id)).await
    }

    async fn exists_username(&self, username: &str) -> UserRepositoryResult<bool> {
        observe(COMPONENT, "exists_username", self.inner.exists_username(username)).await
    }
}
