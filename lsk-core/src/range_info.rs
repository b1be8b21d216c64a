//! Per-request accumulators for one `RangeKey`, and the durable audit
//! record derived from them.

use indexmap::IndexMap;

/// Per-request accumulator for one `RangeKey`.
///
/// Invariant (enforced by the Coordinator, not by this type): the values
/// assigned to the placeholders recorded here form the contiguous run
/// `[first_value, last_value]`, with no gaps.
#[derive(Debug, Clone, Default)]
pub struct RangeInfo {
    pub first_value: Option<i64>,
    pub last_value: Option<i64>,
    /// Text of every `<…>`/`<…/>` tag containing a PK placeholder that
    /// belongs to this key, in the order encountered.
    pub fragments: Vec<String>,
    /// `placeholder → "Table:Column:Module:Value"`, PKs of this key only,
    /// in first-assignment order (matches `SPEC_FULL.md`'s `mapping:
    /// IndexMap<String, String>`).
    pub mapping: IndexMap<String, String>,
}

impl RangeInfo {
    /// Record one assignment: sets `first_value` on first touch, always
    /// overwrites `last_value`.
    pub fn record_assignment(&mut self, value: i64) {
        if self.first_value.is_none() {
            self.first_value = Some(value);
        }
        self.last_value = Some(value);
    }

    /// Number of distinct placeholders assigned under this key, per the
    /// contiguity invariant (`end - start + 1`).
    pub fn count(&self) -> i64 {
        match (self.first_value, self.last_value) {
            (Some(first), Some(last)) => last - first + 1,
            _ => 0,
        }
    }
}

/// One durable row of the Audit Log: the committed allocation for one
/// `RangeKey` within one request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub dev_email: String,
    pub table: String,
    pub column: String,
    pub module: String,
    pub start_value: i64,
    pub end_value: i64,
    /// `placeholder → "Table:Column:Module:Value"` for PKs of this key.
    pub placeholder_mapping: serde_json::Value,
    /// Original element fragments, newline-joined.
    pub source_xml_elements: String,
    /// Same fragments after applying the request-global replacement
    /// table (PKs and FKs).
    pub resolved_xml_elements: String,
}
