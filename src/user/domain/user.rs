//! User account aggregate.

use super::{UserDomainError, UserId};

/// A user account record.
///
/// The identifier is optional until the account is stored: repositories
/// assign a fresh identifier to users created without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Option<UserId>,
    first_name: String,
    last_name: String,
    username: String,
    email: String,
}

impl User {
    /// Creates a user with the required username and email.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: String::new(),
            last_name: String::new(),
            username: username.into(),
            email: email.into(),
        }
    }

    /// Sets the user identifier.
    #[must_use]
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets first and last names.
    #[must_use]
    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Assigns a random identifier when none is set.
    #[must_use]
    pub fn ensure_id(mut self) -> Self {
        if self.id.is_none() {
            self.id = Some(UserId::generate());
        }
        self
    }

    /// Returns the identifier, if one has been assigned.
    #[must_use]
    pub const fn id(&self) -> Option<&UserId> {
        self.id.as_ref()
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the username (nickname).
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Checks that the email is a single `local@domain` mailbox.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidEmail`] when the address is
    /// malformed.
    pub fn validate_email(&self) -> Result<(), UserDomainError> {
        if is_mailbox(&self.email) {
            Ok(())
        } else {
            Err(UserDomainError::InvalidEmail(self.email.clone()))
        }
    }
}

fn is_mailbox(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}
