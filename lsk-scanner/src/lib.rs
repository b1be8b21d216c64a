//! LSK Scanner - Placeholder Extraction
//!
//! Pure, single-pass text scanning over an XML-looking buffer. No I/O, no
//! mutation of the input. See `scan_pk`/`scan_fk` for the two operations.

mod patterns;
mod scanner;

pub use scanner::{scan_fk, scan_pk, PkMatches, FkMatches};
