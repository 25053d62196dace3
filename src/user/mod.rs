//! User account storage.
//!
//! Users are single-document records with no transactional requirements.
//! The module follows the same hexagonal split as [`crate::chat`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
