//! In-memory repository for user account tests.

use crate::user::{
    domain::{User, UserCriteria, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::internal(std::io::Error::other(err.to_string()))
}

fn required(value: &str, what: &str) -> UserRepositoryResult<()> {
    if value.trim().is_empty() {
        return Err(UserRepositoryError::InvalidArgument(format!(
            "{what} must not be empty"
        )));
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserRepositoryResult<User> {
        user.validate_email()?;
        let stored = user.ensure_id();
        let mut users = self.users.write().map_err(poisoned)?;
        if users.iter().any(|existing| existing.id() == stored.id()) {
            return Err(UserRepositoryError::InvalidArgument(
                "user identifier already exists".to_owned(),
            ));
        }
        users.push(stored.clone());
        Ok(stored)
    }

    async fn find(&self, criteria: UserCriteria) -> UserRepositoryResult<User> {
        let filter = criteria
            .into_filter()
            .ok_or(UserRepositoryError::CannotFind)?;
        let users = self.users.read().map_err(poisoned)?;
        users
            .iter()
            .find(|user| filter.matches(user))
            .cloned()
            .ok_or(UserRepositoryError::NotFound)
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let id = user.id().ok_or_else(|| {
            UserRepositoryError::InvalidArgument("user identifier is required".to_owned())
        })?;
        let mut users = self.users.write().map_err(poisoned)?;
        match users.iter_mut().find(|stored| stored.id() == Some(id)) {
            Some(stored) => *stored = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(())
    }

    async fn exists(&self, id: &str) -> UserRepositoryResult<bool> {
        let wanted = UserId::new(id)?;
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().any(|user| user.id() == Some(&wanted)))
    }

    async fn exists_username(&self, username: &str) -> UserRepositoryResult<bool> {
        required(username, "username")?;
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().any(|user| user.username() == username))
    }
}
