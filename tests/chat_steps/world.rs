//! Shared world state for chat creation BDD scenarios.

use std::sync::Arc;

use chatstore::chat::{
    adapters::memory::InMemoryChatStore,
    domain::{Chat, ChatDraft},
    ports::ChatRepositoryError,
    services::ChatRepositoryService,
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use tracing_subscriber::EnvFilter;

/// Repository type used by the BDD world.
pub type TestChatService = ChatRepositoryService<InMemoryChatStore, StepClock>;

/// Clock that reports the instant a scenario sets.
#[derive(Debug, Clone, Copy)]
pub struct StepClock(pub DateTime<Utc>);

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Instant reported until a scenario sets the clock.
fn default_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Scenario world for chat creation behaviour tests.
pub struct ChatWorld {
    pub store: InMemoryChatStore,
    pub service: TestChatService,
    pub pending_draft: Option<ChatDraft>,
    pub created_chat: Option<Chat>,
    pub last_create_result: Option<Result<Chat, ChatRepositoryError>>,
    pub lookup_results: Vec<Result<Chat, ChatRepositoryError>>,
    pub listings: Vec<Vec<Chat>>,
}

impl ChatWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryChatStore::new();
        let service = service_over(&store, default_instant());
        Self {
            store,
            service,
            pending_draft: None,
            created_chat: None,
            last_create_result: None,
            lookup_results: Vec::new(),
            listings: Vec::new(),
        }
    }
}

impl ChatWorld {
    /// Rebuilds the service so every later call observes `instant`.
    pub fn set_clock(&mut self, instant: DateTime<Utc>) {
        self.service = service_over(&self.store, instant);
    }
}

fn service_over(store: &InMemoryChatStore, instant: DateTime<Utc>) -> TestChatService {
    ChatRepositoryService::new(Arc::new(store.clone()), Arc::new(StepClock(instant)))
}

impl Default for ChatWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ChatWorld {
    let _outcome = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    ChatWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated step argument into trimmed user ids.
pub fn split_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parses an RFC 3339 step argument into a UTC instant.
///
/// # Errors
///
/// Returns an error if the text is not a valid RFC 3339 timestamp.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, eyre::Report> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
