//! `MongoDB` adapter for chat storage.
//!
//! Chats live in the `chat` collection and memberships in `chats_users`.
//! Identifiers are stored as strings and timestamps as epoch milliseconds.

mod documents;
mod errors;
mod filter;
mod store;

pub use store::MongoChatStore;
