//! Chat and participant storage.
//!
//! This module owns the transactional creation path that writes a chat
//! header together with one membership record per participant, the filter
//! construction used by chat lookups, and the non-transactional membership
//! update path. It follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
