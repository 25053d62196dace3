//! Adapter implementations for user account storage.

pub mod memory;
pub mod mongo;

mod traced;

pub use traced::TracedUserRepository;
