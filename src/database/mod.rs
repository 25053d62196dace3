//! Database connection settings and client bootstrap.
//!
//! The process that embeds this crate owns the [`mongodb::Client`]; this
//! module only builds it from [`DatabaseConfig`] and verifies the server is
//! reachable. Repositories receive the client at construction.

mod config;
mod connect;

pub use config::{DatabaseConfig, DatabaseConfigError};
pub use connect::{ConnectError, connect};

/// Default database holding every collection below.
pub const DEFAULT_DATABASE: &str = "chat-service";

/// Collection of chat header documents.
pub const CHAT_COLLECTION: &str = "chat";

/// Collection of per-participant membership documents.
pub const CHATS_USERS_COLLECTION: &str = "chats_users";

/// Collection of user account documents.
pub const USER_COLLECTION: &str = "user";
