//! Audit Log Store: the single append-only table the engine ever writes.
//!
//! Schema:
//! ```sql
//! CREATE TABLE lsk_audit_log (
//!     id                  BIGSERIAL PRIMARY KEY,      -- 1
//!     dev_email           TEXT NOT NULL,              -- 2
//!     table_name          TEXT NOT NULL,              -- 3
//!     column_name         TEXT NOT NULL,              -- 4
//!     module_name         TEXT NOT NULL,              -- 5
//!     start_value         BIGINT NOT NULL,            -- 6
//!     end_value           BIGINT NOT NULL,            -- 7
//!     placeholder_mapping JSONB NOT NULL,             -- 8
//!     source_xml_elements TEXT NOT NULL,              -- 9
//!     resolved_xml_elements TEXT NOT NULL,            -- 10
//!     created_at          TIMESTAMPTZ NOT NULL DEFAULT now() -- 11
//! );
//! CREATE INDEX idx_lsk_audit_log_range_key
//!     ON lsk_audit_log (table_name, column_name, module_name);
//! ```
//!
//! The engine only ever inserts into this table and reads
//! `MAX(end_value)` filtered by `(table_name, column_name, module_name)`
//! — no updates, no deletes.

use deadpool_postgres::Transaction;
use lsk_core::{AuditRecord, ResolutionError, ResolutionResult};
use lsk_engine::AuditSink;

use crate::timeout::with_statement_timeout;

#[derive(Debug, Default, Clone, Copy)]
pub struct AuditLogStore;

impl AuditLogStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert one audit row. Returns `AuditWriteFailed` if the insert
    /// affects a row count other than one.
    pub async fn insert(&self, tx: &Transaction<'_>, record: &AuditRecord) -> ResolutionResult<()> {
        let affected = with_statement_timeout(
            tx.execute(
                "INSERT INTO lsk_audit_log \
                 (dev_email, table_name, column_name, module_name, start_value, end_value, \
                  placeholder_mapping, source_xml_elements, resolved_xml_elements) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                &[
                    &record.dev_email,
                    &record.table,
                    &record.column,
                    &record.module,
                    &record.start_value,
                    &record.end_value,
                    &record.placeholder_mapping,
                    &record.source_xml_elements,
                    &record.resolved_xml_elements,
                ],
            ),
            ResolutionError::AuditWriteFailed,
        )
        .await?;

        if affected != 1 {
            return Err(ResolutionError::AuditWriteFailed(format!(
                "insert affected {affected} rows, expected 1"
            )));
        }

        Ok(())
    }

    /// The same query the Allocator issues under its advisory lock.
    /// Exposed here too for read-side/reporting callers that don't need
    /// the lock.
    pub async fn max_end_value(
        &self,
        tx: &Transaction<'_>,
        table: &str,
        column: &str,
        module: &str,
    ) -> ResolutionResult<i64> {
        let row = with_statement_timeout(
            tx.query_one(
                "SELECT COALESCE(MAX(end_value), 0) FROM lsk_audit_log \
                 WHERE table_name = $1 AND column_name = $2 AND module_name = $3",
                &[&table, &column, &module],
            ),
            |msg| ResolutionError::AllocationFailed(format!("max(end_value): {msg}")),
        )
        .await?;

        Ok(row.get(0))
    }
}

/// Borrows a transaction so the stateless [`AuditLogStore`] can satisfy
/// `lsk_engine::AuditSink`.
pub struct TxAuditLogStore<'a> {
    store: AuditLogStore,
    tx: &'a Transaction<'a>,
}

impl<'a> TxAuditLogStore<'a> {
    pub fn new(tx: &'a Transaction<'a>) -> Self {
        Self {
            store: AuditLogStore::new(),
            tx,
        }
    }
}

#[async_trait::async_trait]
impl AuditSink for TxAuditLogStore<'_> {
    async fn insert(&self, record: &AuditRecord) -> ResolutionResult<()> {
        self.store.insert(self.tx, record).await
    }
}
