//! Composable lookup filters for chats.
//!
//! Criteria are partial: each populated field contributes one clause. A
//! criteria value with nothing populated produces no filter at all, so
//! storage adapters never see a "match everything" query.

use super::{Chat, ChatDomainError, ChatId, ChatKind};
use crate::user::domain::UserId;

/// One predicate of a chat lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatClause {
    /// Exact chat identifier match.
    Id(ChatId),
    /// Exact owner match.
    Owner(UserId),
    /// The participant list contains every listed user (superset match).
    ContainsAll(Vec<UserId>),
    /// Exact chat type match.
    Kind(ChatKind),
    /// At least one nested clause holds.
    AnyOf(Vec<ChatClause>),
}

impl ChatClause {
    /// Returns whether the chat satisfies this predicate.
    #[must_use]
    pub fn matches(&self, chat: &Chat) -> bool {
        match self {
            Self::Id(id) => chat.id() == *id,
            Self::Owner(owner) => chat.owner_id() == owner,
            Self::ContainsAll(users) => users.iter().all(|user| chat.has_participant(user)),
            Self::Kind(kind) => chat.kind() == *kind,
            Self::AnyOf(clauses) => clauses.iter().any(|clause| clause.matches(chat)),
        }
    }
}

/// Non-empty conjunction of [`ChatClause`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatFilter {
    clauses: Vec<ChatClause>,
}

impl ChatFilter {
    /// Matches every chat owned by `owner`.
    #[must_use]
    pub fn owned_by(owner: UserId) -> Self {
        Self {
            clauses: vec![ChatClause::Owner(owner)],
        }
    }

    /// Matches the personal chat between two users.
    ///
    /// Either user may be the owner, so the filter is symmetric in its
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::SelfPersonalChat`] when both arguments name
    /// the same user; such a filter would match every personal chat of that
    /// user.
    pub fn personal_between(first: UserId, second: UserId) -> Result<Self, ChatDomainError> {
        if first == second {
            return Err(ChatDomainError::SelfPersonalChat(first));
        }
        Ok(Self {
            clauses: vec![
                ChatClause::Kind(ChatKind::Personal),
                ChatClause::ContainsAll(vec![first.clone(), second.clone()]),
                ChatClause::AnyOf(vec![ChatClause::Owner(first), ChatClause::Owner(second)]),
            ],
        })
    }

    /// Returns the clauses; a chat matches when all of them hold.
    #[must_use]
    pub fn clauses(&self) -> &[ChatClause] {
        &self.clauses
    }

    /// Returns whether the chat satisfies every clause.
    #[must_use]
    pub fn matches(&self, chat: &Chat) -> bool {
        self.clauses.iter().all(|clause| clause.matches(chat))
    }
}

/// Partially filled search criteria for a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatCriteria {
    id: Option<ChatId>,
    owner_id: Option<UserId>,
    participants: Vec<UserId>,
}

impl ChatCriteria {
    /// Creates empty criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches by chat identifier.
    #[must_use]
    pub const fn with_id(mut self, id: ChatId) -> Self {
        self.id = Some(id);
        self
    }

    /// Searches by owner.
    #[must_use]
    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Searches for chats whose participants include all of `participants`.
    #[must_use]
    pub fn with_participants(mut self, participants: impl IntoIterator<Item = UserId>) -> Self {
        self.participants = participants.into_iter().collect();
        self
    }

    /// Returns whether no field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.owner_id.is_none() && self.participants.is_empty()
    }

    /// Builds a filter requiring every populated field to match.
    ///
    /// Returns `None` when no field is populated.
    #[must_use]
    pub fn into_filter(self) -> Option<ChatFilter> {
        let clauses = self.into_clauses();
        (!clauses.is_empty()).then_some(ChatFilter { clauses })
    }

    fn into_clauses(self) -> Vec<ChatClause> {
        let mut clauses = Vec::with_capacity(3);
        if !self.participants.is_empty() {
            clauses.push(ChatClause::ContainsAll(self.participants));
        }
        if let Some(owner_id) = self.owner_id {
            clauses.push(ChatClause::Owner(owner_id));
        }
        if let Some(id) = self.id {
            clauses.push(ChatClause::Id(id));
        }
        clauses
    }
}
