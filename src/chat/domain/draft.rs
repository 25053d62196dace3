//! Chat creation drafts and their validation.

use super::{ChatDomainError, ChatKind};
use crate::user::domain::UserId;
use std::collections::HashSet;

/// Caller-supplied data for a chat that does not exist yet.
///
/// A default-constructed draft is blank: it has no owner and is rejected
/// before any storage call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatDraft {
    title: String,
    kind: ChatKind,
    owner_id: String,
    participants: Vec<String>,
    label: Option<String>,
    pinned_message_ids: Vec<String>,
    pinned_message_id: Option<String>,
}

impl ChatDraft {
    /// Creates a draft of the given type owned by `owner_id`.
    #[must_use]
    pub fn new(kind: ChatKind, owner_id: impl Into<String>) -> Self {
        Self {
            kind,
            owner_id: owner_id.into(),
            ..Self::default()
        }
    }

    /// Sets the chat title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets participant identifiers; order is preserved.
    #[must_use]
    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = participants.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the chat label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets pinned message references.
    #[must_use]
    pub fn with_pinned_messages<I, S>(mut self, message_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pinned_message_ids = message_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the primary pinned message.
    #[must_use]
    pub fn with_pinned_message(mut self, message_id: impl Into<String>) -> Self {
        self.pinned_message_id = Some(message_id.into());
        self
    }

    /// Returns the requested chat type.
    #[must_use]
    pub const fn kind(&self) -> ChatKind {
        self.kind
    }

    /// Returns participant identifiers as supplied.
    #[must_use]
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Validates the draft.
    ///
    /// Participants are not required here, whatever the chat type: an empty
    /// list passes validation and is rejected by the transactional write,
    /// which refuses to create a chat with no membership records.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::MissingOwner`] for a blank owner,
    /// [`ChatDomainError::EmptyParticipant`] or
    /// [`ChatDomainError::DuplicateParticipant`] for a malformed participant
    /// list, and the personal-chat errors when a personal draft does not
    /// name exactly its owner and one other user.
    pub fn validate(self) -> Result<ValidatedDraft, ChatDomainError> {
        let owner_id = UserId::new(self.owner_id).map_err(|_| ChatDomainError::MissingOwner)?;

        let mut seen = HashSet::with_capacity(self.participants.len());
        let mut participants = Vec::with_capacity(self.participants.len());
        for (position, raw) in self.participants.into_iter().enumerate() {
            let participant =
                UserId::new(raw).map_err(|_| ChatDomainError::EmptyParticipant(position))?;
            if !seen.insert(participant.clone()) {
                return Err(ChatDomainError::DuplicateParticipant(participant));
            }
            participants.push(participant);
        }

        if self.kind == ChatKind::Personal && !participants.is_empty() {
            if participants.len() != 2 {
                return Err(ChatDomainError::PersonalParticipantCount(participants.len()));
            }
            if !participants.contains(&owner_id) {
                return Err(ChatDomainError::OwnerNotParticipant(owner_id));
            }
        }

        Ok(ValidatedDraft {
            title: self.title,
            kind: self.kind,
            owner_id,
            participants,
            label: self.label.filter(|label| !label.trim().is_empty()),
            pinned_message_ids: self.pinned_message_ids,
            pinned_message_id: self.pinned_message_id.filter(|id| !id.trim().is_empty()),
        })
    }
}

/// A draft that passed [`ChatDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub(super) title: String,
    pub(super) kind: ChatKind,
    pub(super) owner_id: UserId,
    pub(super) participants: Vec<UserId>,
    pub(super) label: Option<String>,
    pub(super) pinned_message_ids: Vec<String>,
    pub(super) pinned_message_id: Option<String>,
}

impl ValidatedDraft {
    /// Returns the validated owner.
    #[must_use]
    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Returns the validated participants in supplied order.
    #[must_use]
    pub fn participants(&self) -> &[UserId] {
        &self.participants
    }
}
