//! Per-call structured logging shared by the repository decorators.

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

/// Runs `call` inside a span carrying `component` and `operation`, then logs
/// the outcome with the elapsed time.
pub(crate) async fn observe<T, E, F>(
    component: &'static str,
    operation: &'static str,
    call: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let span = tracing::info_span!("repository_call", component, operation);
    async move {
        let started = Instant::now();
        let result = call.await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(_) => tracing::debug!(duration_ms, "call succeeded"),
            Err(err) => tracing::warn!(duration_ms, error = %err, "call failed"),
        }
        result
    }
    .instrument(span)
    .await
}
