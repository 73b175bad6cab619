//! Audit & compliance logging.
//!
//! Every access decision and audit-worthy domain event is recorded as an
//! immutable [`AuditLogEntry`] in an append-only store. The logger
//! derives a risk score and compliance flags for each entry and escalates
//! critical events through an injectable notifier. A failed audit write
//! is a compliance violation and always propagates to the caller.

pub mod entry;
pub mod error;
pub mod logger;
pub mod notify;
pub mod query;
pub mod risk;
pub mod store;

pub use entry::{AuditEvent, AuditEventBuilder, AuditEventType, AuditLogEntry, ComplianceFlag};
pub use error::{AuditError, Result};
pub use logger::{AuditConfig, AuditLogger};
pub use notify::{EscalationNotifier, NoopNotifier, TracingNotifier};
pub use query::{ActorActivity, AuditQuery, ComplianceReport, RiskHistogram};
pub use risk::level_for_score;
pub use store::{AuditStore, DynAuditStore, InMemoryAuditStore};
