//! Chatstore: durable storage layer for a chat service.
//!
//! This crate stores chats, per-participant chat memberships, and user
//! accounts in a document database and exposes typed repository contracts to
//! the service layer above it.
//!
//! # Architecture
//!
//! Chatstore follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`MongoDB`, in-memory,
//!   tracing decorators)
//!
//! # Modules
//!
//! - [`chat`]: Transactional chat creation, lookup filters, and membership
//!   windows
//! - [`user`]: User account storage
//! - [`database`]: Connection settings and client bootstrap

pub mod chat;
pub mod database;
pub mod user;

mod telemetry;
