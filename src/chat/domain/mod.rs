//! Domain model for chats and chat memberships.
//!
//! Chats, drafts, membership windows, and lookup filters are pure values;
//! nothing here touches storage.

mod chat;
mod criteria;
mod draft;
mod error;
mod ids;
mod membership;
mod message;

pub use chat::{Chat, ChatKind, PersistedChatData};
pub use criteria::{ChatClause, ChatCriteria, ChatFilter};
pub use draft::{ChatDraft, ValidatedDraft};
pub use error::ChatDomainError;
pub use ids::{ChatId, MembershipId};
pub use membership::{
    ChatMembership, MembershipWindow, OPEN_WINDOW_YEARS, PersistedMembershipData,
    materialize_memberships,
};
pub use message::{MessageKind, MessageSnapshot};
