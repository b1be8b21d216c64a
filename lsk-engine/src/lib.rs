//! LSK Engine - Resolution Coordinator
//!
//! Orchestrates the Scan -> Allocate -> Resolve -> Substitute -> Audit
//! pipeline over whatever `RangeAllocation`/`AuditSink` pair is wired in.
//! See `lsk-db` for the Postgres-backed pair and `testing` for the
//! in-memory fakes used by this crate's own test suite.

mod coordinator;
mod traits;

pub mod testing;

pub use coordinator::{ResolutionCoordinator, ResolveRequest};
pub use traits::{AuditSink, RangeAllocation};
