//! Statement-level timeout applied around every allocator/audit query.
//!
//! `spec.md` §5: "Implementations MAY impose a statement-level timeout;
//! on timeout the phase fails and the transaction rolls back." Configured
//! through `LSK_DB_STATEMENT_TIMEOUT_MS`, defaulting to 30 seconds; set to
//! `0` to disable (an effectively unbounded wait, matching §5's default
//! "waits indefinitely" behavior).

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use lsk_core::{ResolutionError, ResolutionResult};

fn statement_timeout() -> Option<Duration> {
    static TIMEOUT: OnceLock<Option<Duration>> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let millis = std::env::var("LSK_DB_STATEMENT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30_000);
        if millis == 0 {
            None
        } else {
            Some(Duration::from_millis(millis))
        }
    })
}

/// Drive `fut` to completion, failing with `err("statement timed out")` if
/// it doesn't resolve within the configured statement timeout. `err` also
/// wraps whatever underlying error `fut` itself produces, so call sites
/// keep a single error-mapping closure regardless of which failure mode
/// fires.
pub async fn with_statement_timeout<T, E: std::fmt::Display>(
    fut: impl Future<Output = Result<T, E>>,
    err: impl Fn(String) -> ResolutionError,
) -> ResolutionResult<T> {
    let Some(timeout) = statement_timeout() else {
        return fut.await.map_err(|e| err(e.to_string()));
    };

    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(|e| err(e.to_string())),
        Err(_) => Err(err("statement timed out".to_string())),
    }
}
