//! Disjunctive lookup criteria for user search.

use super::{User, UserId};

/// One predicate of a user lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserClause {
    /// Exact identifier match.
    Id(UserId),
    /// Exact username match.
    Username(String),
    /// Exact email match.
    Email(String),
}

impl UserClause {
    /// Returns whether the user satisfies this predicate.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Id(id) => user.id() == Some(id),
            Self::Username(username) => user.username() == username,
            Self::Email(email) => user.email() == email,
        }
    }
}

/// Non-empty disjunction of [`UserClause`] values.
///
/// Constructed only through [`UserCriteria::into_filter`], so a filter always
/// carries at least one clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    clauses: Vec<UserClause>,
}

impl UserFilter {
    /// Returns the clauses; a user matches when any clause holds.
    #[must_use]
    pub fn clauses(&self) -> &[UserClause] {
        &self.clauses
    }

    /// Returns whether the user satisfies at least one clause.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.clauses.iter().any(|clause| clause.matches(user))
    }
}

/// Partially filled search criteria for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCriteria {
    id: Option<UserId>,
    username: Option<String>,
    email: Option<String>,
}

impl UserCriteria {
    /// Creates empty criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches by identifier.
    #[must_use]
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Searches by username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Searches by email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builds the disjunctive filter.
    ///
    /// Email and username each contribute a clause. The identifier is only
    /// used when neither is present. Returns `None` when nothing usable was
    /// supplied.
    #[must_use]
    pub fn into_filter(self) -> Option<UserFilter> {
        let mut clauses = Vec::new();
        if let Some(email) = self.email.filter(|value| !value.trim().is_empty()) {
            clauses.push(UserClause::Email(email));
        }
        if let Some(username) = self.username.filter(|value| !value.trim().is_empty()) {
            clauses.push(UserClause::Username(username));
        }
        if clauses.is_empty()
            && let Some(id) = self.id
        {
            clauses.push(UserClause::Id(id));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(UserFilter { clauses })
        }
    }
}
