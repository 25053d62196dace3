//! Repository port for user account persistence and lookup.

use crate::user::domain::{User, UserCriteria, UserDomainError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user, assigning an identifier when none is set.
    ///
    /// Returns the stored user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::InvalidArgument`] when the email is
    /// malformed, or [`UserRepositoryError::Internal`] when the insert fails.
    async fn create(&self, user: User) -> UserRepositoryResult<User>;

    /// Finds a user by email or username, falling back to identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::CannotFind`] when the criteria carry
    /// nothing to search by and [`UserRepositoryError::NotFound`] when no
    /// user matches.
    async fn find(&self, criteria: UserCriteria) -> UserRepositoryResult<User>;

    /// Replaces the stored user with the same identifier, inserting it when
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::InvalidArgument`] when the user has no
    /// identifier.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Reports whether a user with the identifier exists.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::InvalidArgument`] for a blank
    /// identifier.
    async fn exists(&self, id: &str) -> UserRepositoryResult<bool>;

    /// Reports whether the username is taken.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::InvalidArgument`] for a blank username.
    async fn exists_username(&self, username: &str) -> UserRepositoryResult<bool>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// The request carried invalid data.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The criteria did not contain anything to search by.
    #[error("cannot find user: no search criteria supplied")]
    CannotFind,

    /// No user matched the lookup.
    #[error("user not found")]
    NotFound,

    /// Persistence-layer failure.
    #[error("internal error: {0}")]
    Internal(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl From<UserDomainError> for UserRepositoryError {
    fn from(err: UserDomainError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
