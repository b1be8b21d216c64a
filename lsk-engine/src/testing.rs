//! In-memory fakes for `RangeAllocation`/`AuditSink`, used by the
//! coordinator's own test suite and available to downstream crates that
//! want to exercise `resolve` without a live database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lsk_core::{AuditRecord, RangeKey, ResolutionError, ResolutionResult};

use crate::traits::{AuditSink, RangeAllocation};

/// Tracks the highest `end_value` committed per `RangeKey`, mirroring
/// what `MAX(end_value) FROM lsk_audit_log` would return.
#[derive(Debug, Default)]
pub struct FakeRangeAllocator {
    high_water: Mutex<HashMap<RangeKey, i64>>,
}

impl FakeRangeAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing high-water mark, as if prior requests had
    /// already committed audit rows for this key.
    pub fn seed(&self, key: RangeKey, end_value: i64) {
        self.high_water.lock().unwrap().insert(key, end_value);
    }
}

#[async_trait]
impl RangeAllocation for FakeRangeAllocator {
    async fn next_starting_value(&self, key: &RangeKey) -> ResolutionResult<i64> {
        let map = self.high_water.lock().unwrap();
        Ok(map.get(key).copied().unwrap_or(0) + 1)
    }
}

/// Records every committed audit row, in commit order.
#[derive(Debug, Default)]
pub struct FakeAuditSink {
    records: Mutex<Vec<AuditRecord>>,
    fail_next: Mutex<bool>,
}

impl FakeAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Force the next `insert` call to fail, to exercise the
    /// `AuditWriteFailed` path.
    pub fn fail_next_insert(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

#[async_trait]
impl AuditSink for FakeAuditSink {
    async fn insert(&self, record: &AuditRecord) -> ResolutionResult<()> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(ResolutionError::AuditWriteFailed(
                "forced failure for test".to_string(),
            ));
        }
        drop(fail);
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Convenience pairing the two fakes with a shared allocator, so a
/// second `resolve` call in the same test observes the first's commits
/// — matching how a real pool observes committed rows across requests.
pub struct FakeBackend {
    pub allocator: FakeRangeAllocator,
    pub audit: FakeAuditSink,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            allocator: FakeRangeAllocator::new(),
            audit: FakeAuditSink::new(),
        }
    }

    /// Replay the committed audit rows back into the allocator's
    /// high-water marks, as a real `MAX(end_value)` query would see
    /// them on the next request.
    pub fn sync_allocator_from_audit(&self) {
        for record in self.audit.records() {
            let key = RangeKey::new(&record.table, &record.column, &record.module);
            self.allocator.seed(key, record.end_value);
        }
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}
