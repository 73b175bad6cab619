//! Escalation side-channel for critical audit entries.

use async_trait::async_trait;

use crate::entry::AuditLogEntry;
use crate::error::AuditError;

/// Receives critical-risk audit entries for paging or alerting.
///
/// Invoked synchronously by the logger after the entry is durably
/// stored. Implementations integrate with whatever alerting channel the
/// deployment has; environments without one use [`NoopNotifier`].
#[async_trait]
pub trait EscalationNotifier: Send + Sync {
    /// Deliver a critical entry to the alerting channel.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Notification` on delivery failure. The
    /// logger logs the failure but does not unwind the already-persisted
    /// entry.
    async fn notify(&self, entry: &AuditLogEntry) -> Result<(), AuditError>;
}

/// Default notifier: surfaces critical entries in the log stream.
#[derive(Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl EscalationNotifier for TracingNotifier {
    async fn notify(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
        tracing::warn!(
            audit_id = %entry.id,
            event = entry.event_type.code(),
            actor_id = %entry.actor_id,
            resource_type = %entry.resource_type,
            risk_score = entry.risk_score,
            "critical audit event"
        );
        Ok(())
    }
}

/// No-op notifier for environments without an alerting integration.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl EscalationNotifier for NoopNotifier {
    async fn notify(&self, _entry: &AuditLogEntry) -> Result<(), AuditError> {
        Ok(())
    }
}
