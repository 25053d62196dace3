//! Shared fixtures for chat unit tests.

use crate::chat::{adapters::memory::InMemoryChatStore, services::ChatRepositoryService};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) type TestService = ChatRepositoryService<InMemoryChatStore, FixedClock>;

/// Instant every fixture clock reports; carries sub-millisecond precision
/// that storage truncates.
#[fixture]
pub(super) fn now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_709_285_400, 123_456_789)
        .single()
        .expect("valid fixture timestamp")
}

#[fixture]
pub(super) fn store() -> InMemoryChatStore {
    InMemoryChatStore::new()
}

pub(super) fn service_over(store: &InMemoryChatStore, now: DateTime<Utc>) -> TestService {
    ChatRepositoryService::new(Arc::new(store.clone()), Arc::new(FixedClock(now)))
}

/// Routes decorator spans to the test writer; filtered by `RUST_LOG`.
pub(super) fn init_test_logging() {
    let _outcome = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
