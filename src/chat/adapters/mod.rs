//! Adapter implementations for chat storage.

pub mod memory;
pub mod mongo;

mod traced;

pub use traced::TracedChatRepository;
