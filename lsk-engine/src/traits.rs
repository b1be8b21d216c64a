//! Seams the Coordinator is generic over, so it can run against a real
//! Postgres-backed pair (`lsk-db`) or an in-memory pair (`testing`)
//! without any `#[cfg(test)]` branching in `coordinator.rs` itself.

use async_trait::async_trait;
use lsk_core::{AuditRecord, RangeKey, ResolutionResult};

/// The Range Allocator collaborator (§4.2 of the engine's spec).
///
/// A single call corresponds to "acquire the advisory lock for `key`,
/// read `MAX(end_value)`, and return one past it". The lock, if any, is
/// the implementation's responsibility to hold until whatever
/// transaction this call participates in ends — the trait itself is
/// silent on transactions, since the in-memory fake has none.
#[async_trait]
pub trait RangeAllocation: Send + Sync {
    async fn next_starting_value(&self, key: &RangeKey) -> ResolutionResult<i64>;
}

/// The Audit Log Store collaborator (§4.4).
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn insert(&self, record: &AuditRecord) -> ResolutionResult<()>;
}
