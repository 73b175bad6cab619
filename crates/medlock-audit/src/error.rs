use std::time::Duration;

use thiserror::Error;

/// Errors raised by the audit logger.
///
/// A persistence failure is never swallowed: callers of `record` must
/// treat it as fatal to the surrounding operation, because an access
/// whose audit entry was not durably written may not proceed.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit store write failed: {0}")]
    Store(String),

    #[error("Audit store did not respond within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Invalid audit event: {0}")]
    InvalidEvent(String),

    #[error("Escalation notification failed: {0}")]
    Notification(String),
}

impl AuditError {
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout }
    }

    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent(message.into())
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification(message.into())
    }
}

/// Convenience result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;
