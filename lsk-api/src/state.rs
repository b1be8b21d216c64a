//! Shared application state.

use deadpool_postgres::Pool;
use lsk_engine::ResolutionCoordinator;
use std::sync::Arc;

use crate::metrics::{Metrics, METRICS};

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub coordinator: Arc<ResolutionCoordinator>,
    /// Process-wide metrics registry (`&'static` since `prometheus`
    /// collectors register once against the default registry and are
    /// never torn down; see `metrics::METRICS`).
    pub metrics: &'static Metrics,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            coordinator: Arc::new(ResolutionCoordinator::new()),
            metrics: &METRICS,
            start_time: std::time::Instant::now(),
        }
    }
}
