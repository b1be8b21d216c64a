//! LSK Core - Value Types and Errors
//!
//! Pure data structures with no I/O. Every other `lsk-*` crate depends on
//! this one. The LSK Resolution Engine rewrites XML documents that carry
//! symbolic "logical" identifier placeholders into documents carrying
//! concrete, database-assigned integers (see the crate-level GLOSSARY in
//! the workspace root `SPEC_FULL.md`).

mod error;
mod placeholder;
mod range_info;
mod range_key;

pub use error::{ResolutionError, ResolutionResult};
pub use placeholder::{Placeholder, Reference, ResolvedPlaceholder};
pub use range_info::{AuditRecord, RangeInfo};
pub use range_key::RangeKey;
