//! In-memory chat store for tests and local development.

mod store;

pub use store::{InMemoryChatStore, StoreFault};
