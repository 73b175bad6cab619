//! The audit logger: derives risk scores and compliance flags, enforces
//! a bounded write timeout, and escalates critical entries.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use medlock_core::RiskLevel;

use crate::entry::{AuditEvent, AuditLogEntry};
use crate::error::{AuditError, Result};
use crate::notify::{EscalationNotifier, TracingNotifier};
use crate::query::{AuditQuery, ComplianceReport};
use crate::risk::{compliance_flags, level_for_score, risk_score};
use crate::store::DynAuditStore;

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditConfig {
    /// Upper bound on a single store write. An unresponsive sink fails
    /// the call instead of hanging it; the failure counts as an audit
    /// write failure.
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            write_timeout: Duration::from_secs(5),
        }
    }
}

/// Records audit events into an append-only store.
///
/// Holds only shared read-only state (store handle, notifier, config),
/// so one logger instance serves any number of concurrent callers.
pub struct AuditLogger {
    store: DynAuditStore,
    notifier: Arc<dyn EscalationNotifier>,
    config: AuditConfig,
}

impl AuditLogger {
    /// Create a logger over the given store with the default tracing
    /// notifier and configuration.
    #[must_use]
    pub fn new(store: DynAuditStore) -> Self {
        Self {
            store,
            notifier: Arc::new(TracingNotifier),
            config: AuditConfig::default(),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn EscalationNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    /// Derive and durably record one audit entry.
    ///
    /// The entry is persisted before this function returns; a store
    /// failure or timeout propagates and the caller must treat the
    /// surrounding operation as failed. Critical-risk entries are handed
    /// to the escalation notifier after the write; a notifier failure is
    /// logged but does not undo the already-persisted entry.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Store` on persistence failure and
    /// `AuditError::Timeout` when the sink does not respond within the
    /// configured bound.
    pub async fn record(&self, event: AuditEvent) -> Result<AuditLogEntry> {
        let score = risk_score(&event);
        let flags = compliance_flags(&event);

        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            event_type: event.event_type,
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            actor_id: event.actor_id,
            institution_id: event.institution_id,
            recorded_at: event.occurred_at,
            classifications: event.classifications,
            action: event.action,
            allowed: event.allowed,
            risk_score: score,
            risk_level: level_for_score(score),
            compliance_flags: flags,
            metadata: event.metadata,
            source: event.source,
        };

        match tokio::time::timeout(self.config.write_timeout, self.store.insert(&entry)).await {
            Err(_) => {
                tracing::error!(
                    audit_id = %entry.id,
                    timeout = ?self.config.write_timeout,
                    "audit store write timed out"
                );
                return Err(AuditError::timeout(self.config.write_timeout));
            }
            Ok(Err(e)) => {
                tracing::error!(
                    error = %e,
                    audit_id = %entry.id,
                    "failed to persist audit entry"
                );
                return Err(e);
            }
            Ok(Ok(())) => {}
        }

        tracing::debug!(
            audit_id = %entry.id,
            event = entry.event_type.code(),
            actor_id = %entry.actor_id,
            risk = %entry.risk_level,
            "audit entry recorded"
        );

        if entry.risk_level == RiskLevel::Critical
            && let Err(e) = self.notifier.notify(&entry).await
        {
            tracing::error!(
                error = %e,
                audit_id = %entry.id,
                "escalation delivery failed for critical audit event"
            );
        }

        Ok(entry)
    }

    /// Search recorded entries.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Store` on infrastructure failure.
    pub async fn search(&self, query: &AuditQuery) -> Result<Vec<AuditLogEntry>> {
        self.store.search(query).await
    }

    /// Aggregate a compliance report for one institution over a time
    /// window (`from` inclusive, `until` exclusive).
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Store` on infrastructure failure.
    pub async fn compliance_report(
        &self,
        institution_id: &str,
        from: OffsetDateTime,
        until: OffsetDateTime,
    ) -> Result<ComplianceReport> {
        let query = AuditQuery::new()
            .institution(institution_id)
            .between(from, until);
        let entries = self.store.search(&query).await?;
        Ok(ComplianceReport::aggregate(
            institution_id,
            from,
            until,
            &entries,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{AuditEventType, ComplianceFlag};
    use crate::store::{AuditStore, InMemoryAuditStore};
    use async_trait::async_trait;
    use medlock_core::{ActionVerb, DataClassification};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::macros::datetime;

    // -------------------------------------------------------------------------
    // Test Doubles
    // -------------------------------------------------------------------------

    struct FailingStore;

    #[async_trait]
    impl AuditStore for FailingStore {
        async fn insert(&self, _entry: &AuditLogEntry) -> Result<()> {
            Err(AuditError::store("sink unavailable"))
        }

        async fn search(&self, _query: &AuditQuery) -> Result<Vec<AuditLogEntry>> {
            Err(AuditError::store("sink unavailable"))
        }
    }

    struct SlowStore;

    #[async_trait]
    impl AuditStore for SlowStore {
        async fn insert(&self, _entry: &AuditLogEntry) -> Result<()> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        }

        async fn search(&self, _query: &AuditQuery) -> Result<Vec<AuditLogEntry>> {
            Ok(vec![])
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notified: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl EscalationNotifier for RecordingNotifier {
        async fn notify(&self, entry: &AuditLogEntry) -> Result<()> {
            self.notified.lock().unwrap().push(entry.id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FailingNotifier {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl EscalationNotifier for FailingNotifier {
        async fn notify(&self, _entry: &AuditLogEntry) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(AuditError::notification("pager unreachable"))
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn read_event() -> AuditEvent {
        AuditEvent::builder(AuditEventType::ResourceRead)
            .actor("u1")
            .institution("inst-a")
            .resource("MedicalRecord", Some("rec-1".into()))
            .occurred_at(datetime!(2024-03-12 10:00:00 UTC))
            .build()
            .unwrap()
    }

    fn critical_event() -> AuditEvent {
        // denied (5) + PHI (3) = 8 -> critical
        AuditEvent::builder(AuditEventType::AccessDenied)
            .actor("u1")
            .institution("inst-a")
            .resource("MedicalRecord", None)
            .classification(DataClassification::Phi)
            .occurred_at(datetime!(2024-03-12 10:00:00 UTC))
            .build()
            .unwrap()
    }

    // -------------------------------------------------------------------------
    // Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_record_derives_risk_and_flags() {
        let store = Arc::new(InMemoryAuditStore::new());
        let logger = AuditLogger::new(store.clone());

        let event = AuditEvent::builder(AuditEventType::ResourceDeleted)
            .actor("u1")
            .institution("inst-a")
            .resource("LabResult", Some("lab-9".into()))
            .action(ActionVerb::Delete)
            .classification(DataClassification::Phi)
            .occurred_at(datetime!(2024-03-12 10:00:00 UTC))
            .build()
            .unwrap();

        let entry = logger.record(event).await.unwrap();

        // PHI (3) + delete (3) = 6 -> high
        assert_eq!(entry.risk_score, 6);
        assert_eq!(entry.risk_level, RiskLevel::High);
        assert!(entry.has_flag(ComplianceFlag::PhiAccess));
        assert!(entry.has_flag(ComplianceFlag::DataDeletionPhi));
        assert!(!entry.has_flag(ComplianceFlag::UnauthorizedAccess));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let logger = AuditLogger::new(Arc::new(FailingStore));
        let result = logger.record(read_event()).await;
        assert!(matches!(result, Err(AuditError::Store(_))));
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let logger = AuditLogger::new(Arc::new(SlowStore)).with_config(AuditConfig {
            write_timeout: Duration::from_millis(10),
        });

        let result = logger.record(read_event()).await;
        assert!(matches!(result, Err(AuditError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_critical_entry_escalates() {
        let notifier = Arc::new(RecordingNotifier::default());
        let logger =
            AuditLogger::new(Arc::new(InMemoryAuditStore::new())).with_notifier(notifier.clone());

        let entry = logger.record(critical_event()).await.unwrap();
        assert_eq!(entry.risk_level, RiskLevel::Critical);
        assert_eq!(*notifier.notified.lock().unwrap(), vec![entry.id]);
    }

    #[tokio::test]
    async fn test_low_risk_entry_does_not_escalate() {
        let notifier = Arc::new(RecordingNotifier::default());
        let logger =
            AuditLogger::new(Arc::new(InMemoryAuditStore::new())).with_notifier(notifier.clone());

        let entry = logger.record(read_event()).await.unwrap();
        assert_eq!(entry.risk_level, RiskLevel::Low);
        assert!(notifier.notified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_fail_record() {
        let notifier = Arc::new(FailingNotifier::default());
        let store = Arc::new(InMemoryAuditStore::new());
        let logger = AuditLogger::new(store.clone()).with_notifier(notifier.clone());

        let entry = logger.record(critical_event()).await.unwrap();
        assert_eq!(entry.risk_level, RiskLevel::Critical);
        assert_eq!(notifier.attempts.load(Ordering::SeqCst), 1);
        // The entry stayed persisted.
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_compliance_report_scoped_to_institution() {
        let store = Arc::new(InMemoryAuditStore::new());
        let logger = AuditLogger::new(store);

        for institution in ["inst-a", "inst-a", "inst-b"] {
            let event = AuditEvent::builder(AuditEventType::ResourceRead)
                .actor("u1")
                .institution(institution)
                .resource("MedicalRecord", None)
                .occurred_at(datetime!(2024-03-12 10:00:00 UTC))
                .build()
                .unwrap();
            logger.record(event).await.unwrap();
        }

        let report = logger
            .compliance_report(
                "inst-a",
                datetime!(2024-03-01 00:00:00 UTC),
                datetime!(2024-04-01 00:00:00 UTC),
            )
            .await
            .unwrap();

        assert_eq!(report.total_events, 2);
        assert_eq!(report.institution_id, "inst-a");
    }

    #[tokio::test]
    async fn test_search_delegates_to_store() {
        let store = Arc::new(InMemoryAuditStore::new());
        let logger = AuditLogger::new(store);

        logger.record(critical_event()).await.unwrap();
        logger.record(read_event()).await.unwrap();

        let denied = logger
            .search(&AuditQuery::new().event_type(AuditEventType::AccessDenied))
            .await
            .unwrap();
        assert_eq!(denied.len(), 1);
        assert!(!denied[0].allowed);
    }
}
