use thiserror::Error;

use medlock_audit::AuditError;

/// Errors raised during policy evaluation.
///
/// A denied decision is not an error; it is returned as data. The
/// evaluation itself fails only when its audit entry cannot be recorded:
/// the access-control path is deliberately unavailable while auditing is
/// unavailable.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Audit write failed: {0}")]
    Audit(#[from] AuditError),
}

/// Convenience result type for policy operations
pub type Result<T> = std::result::Result<T, PolicyError>;
