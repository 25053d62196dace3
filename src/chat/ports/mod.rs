//! Port contracts for chat storage.
//!
//! [`ChatRepository`] and [`MembershipRepository`] are the contracts the
//! service layer calls. [`ChatStore`] is the narrower storage seam the
//! repository facade drives, implemented by the `MongoDB` and in-memory
//! adapters.

pub mod membership;
pub mod repository;
pub mod store;

pub use membership::MembershipRepository;
pub use repository::{ChatRepository, ChatRepositoryError, ChatRepositoryResult};
pub use store::{
    ChatStore, ChatStoreSession, ReadConcernLevel, SessionSettings, StoreError, StoreResult,
    TransactionSettings, WriteAcknowledgement,
};
