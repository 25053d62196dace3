//! Tunables for the chat repository service.

use crate::chat::ports::{SessionSettings, TransactionSettings};
use std::time::Duration;

/// Consistency and deadline settings for [`super::ChatRepositoryService`].
///
/// The default opens sessions with local read concern and runs creation
/// transactions with majority write concern and local read concern, with no
/// deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatRepositorySettings {
    /// Options for the session opened per creation call.
    pub session: SessionSettings,
    /// Options for the creation transaction.
    pub transaction: TransactionSettings,
    /// Upper bound on a single repository call.
    pub operation_timeout: Option<Duration>,
}

impl ChatRepositorySettings {
    /// Bounds every repository call by `timeout`.
    #[must_use]
    pub const fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }
}
