//! Prometheus metrics for the resolution boundary.
//!
//! Grounded on `caliber-api::telemetry::metrics::CaliberMetrics`: a
//! `once_cell::sync::Lazy` singleton registered once against
//! `prometheus`'s process-wide default registry, with a `/metrics` text
//! handler reading that same registry. Scope is narrower than the
//! teacher's — just the two things `SPEC_FULL.md` §6 calls for:
//! resolutions counted by outcome, and phase latency.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder};

use crate::error::{ApiError, ApiResult};

const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0];

/// Global metrics instance, initialized on first use (mirrors
/// `caliber_api::telemetry::metrics::METRICS`).
pub static METRICS: Lazy<Metrics> = Lazy::new(|| Metrics::new().expect("metrics register exactly once per process"));

pub struct Metrics {
    /// `resolve` calls by outcome: `ok`, or one `ResolutionError` variant
    /// name lower-cased (`invalid_argument`, `allocation_failed`, ...).
    pub resolutions_total: CounterVec,
    /// Wall-clock seconds for a whole `resolve` call, labeled by the
    /// same outcome so slow failures are distinguishable from slow
    /// successes.
    pub resolve_duration_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> ApiResult<Self> {
        let resolutions_total = register_counter_vec!(
            "lsk_resolutions_total",
            "Total resolve() calls by outcome",
            &["outcome"]
        )
        .map_err(|e| ApiError::internal(format!("failed to register lsk_resolutions_total: {e}")))?;

        let resolve_duration_seconds = register_histogram_vec!(
            "lsk_resolve_duration_seconds",
            "resolve() call latency in seconds",
            &["outcome"],
            LATENCY_BUCKETS.to_vec()
        )
        .map_err(|e| ApiError::internal(format!("failed to register lsk_resolve_duration_seconds: {e}")))?;

        Ok(Self {
            resolutions_total,
            resolve_duration_seconds,
        })
    }

    /// Record one completed `resolve` call.
    pub fn record_resolution(&self, outcome: &str, duration_secs: f64) {
        self.resolutions_total.with_label_values(&[outcome]).inc();
        self.resolve_duration_seconds
            .with_label_values(&[outcome])
            .observe(duration_secs);
    }
}

fn gather_text() -> ApiResult<String> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| ApiError::internal(format!("failed to encode metrics: {e}")))?;
    String::from_utf8(buffer).map_err(|e| ApiError::internal(format!("metrics encoding was not utf-8: {e}")))
}

/// `GET /metrics` - Prometheus text exposition.
pub async fn metrics_handler(
    axum::extract::State(state): axum::extract::State<crate::state::AppState>,
) -> impl IntoResponse {
    // Touch `state.metrics` so the handler observes this process's own
    // `AppState`, even though the counters themselves live in the
    // process-wide default registry read by `gather_text`.
    let _ = &state.metrics;

    match gather_text() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_resolution_outcomes_into_the_default_registry() {
        METRICS.record_resolution("ok", 0.01);
        METRICS.record_resolution("unresolved_reference", 0.02);

        let text = gather_text().unwrap();
        assert!(text.contains("lsk_resolutions_total"));
        assert!(text.contains("outcome=\"ok\""));
        assert!(text.contains("outcome=\"unresolved_reference\""));
    }
}
