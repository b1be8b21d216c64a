//! Error taxonomy for the LSK Resolution Engine.

use thiserror::Error;

/// Errors surfaced by the core `resolve` entry point.
///
/// Each variant corresponds to one row of the failure semantics table in
/// the specification: the caller-facing kind is carried by the variant
/// itself, the transaction disposition is the caller's responsibility
/// (the Coordinator rolls back whatever it opened before propagating).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// A required string input (`moduleName`, `devEmail`, the XML body)
    /// was empty or null.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A matched placeholder or reference had an empty segment, or an FK
    /// body did not parse as a well-formed placeholder.
    #[error("invalid placeholder: {0}")]
    InvalidPlaceholder(String),

    /// The Range Allocator failed to acquire the advisory lock or read
    /// `MAX(end_value)`.
    #[error("allocation failed: {0}")]
    AllocationFailed(String),

    /// A `REF:{...}` body has no corresponding PK placeholder in the same
    /// document.
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    /// The audit insert affected a number of rows other than one, or the
    /// underlying write failed.
    #[error("audit write failed: {0}")]
    AuditWriteFailed(String),

    /// Any other unexpected failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResolutionError {
    /// Whether this error is a caller error (maps to HTTP 400 at the
    /// transport boundary) as opposed to a server error (HTTP 500).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ResolutionError::InvalidArgument(_)
                | ResolutionError::InvalidPlaceholder(_)
                | ResolutionError::UnresolvedReference(_)
        )
    }
}

/// Result type alias used throughout the engine.
pub type ResolutionResult<T> = Result<T, ResolutionError>;
