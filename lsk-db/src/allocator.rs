//! Range Allocator: the only database-facing component that touches the
//! advisory lock.

use deadpool_postgres::Transaction;
use lsk_core::{RangeKey, ResolutionError, ResolutionResult};
use lsk_engine::RangeAllocation;

use crate::lock_key::advisory_lock_key;
use crate::timeout::with_statement_timeout;

/// Stateless. Kept as a named struct, rather than free functions, for
/// symmetry with [`crate::AuditLogStore`] and so instrumentation state
/// can be added later without an API break.
#[derive(Debug, Default, Clone, Copy)]
pub struct RangeAllocator;

impl RangeAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Acquire the transaction-scoped advisory lock for `(table, column,
    /// module)` and return one past the highest committed `end_value`
    /// for that key. The lock is released when `tx` ends — callers that
    /// need the reservation to stick must write the corresponding audit
    /// row on this same transaction before committing.
    pub async fn next_starting_value(
        &self,
        tx: &Transaction<'_>,
        table: &str,
        column: &str,
        module: &str,
    ) -> ResolutionResult<i64> {
        let (high, low) = advisory_lock_key(table, column, module);

        with_statement_timeout(
            tx.execute("SELECT pg_advisory_xact_lock($1, $2)", &[&high, &low]),
            |msg| ResolutionError::AllocationFailed(format!("advisory lock: {msg}")),
        )
        .await?;

        let row = with_statement_timeout(
            tx.query_one(
                "SELECT COALESCE(MAX(end_value), 0) FROM lsk_audit_log \
                 WHERE table_name = $1 AND column_name = $2 AND module_name = $3",
                &[&table, &column, &module],
            ),
            |msg| ResolutionError::AllocationFailed(format!("max(end_value): {msg}")),
        )
        .await?;

        let max: i64 = row.get(0);
        Ok(max + 1)
    }
}

/// Borrows a transaction for the lifetime of one `resolve` call so the
/// stateless [`RangeAllocator`] can satisfy `lsk_engine::RangeAllocation`,
/// whose methods don't take a transaction parameter (the trait is shared
/// with the in-memory fakes, which have none).
pub struct TxRangeAllocator<'a> {
    allocator: RangeAllocator,
    tx: &'a Transaction<'a>,
}

impl<'a> TxRangeAllocator<'a> {
    pub fn new(tx: &'a Transaction<'a>) -> Self {
        Self {
            allocator: RangeAllocator::new(),
            tx,
        }
    }
}

#[async_trait::async_trait]
impl RangeAllocation for TxRangeAllocator<'_> {
    async fn next_starting_value(&self, key: &RangeKey) -> ResolutionResult<i64> {
        self.allocator
            .next_starting_value(self.tx, &key.table, &key.column, &key.module)
            .await
    }
}
