//! Audit event model: typed event catalog, compliance flags, the
//! immutable log entry, and the builder used to assemble event inputs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use medlock_core::{ActionVerb, DataClassification, RequestSource, RiskLevel};

use crate::error::{AuditError, Result};

// =============================================================================
// Event Types
// =============================================================================

/// Audit event catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    // Policy decisions
    AccessGranted,
    AccessDenied,

    // Resource lifecycle events recorded by the data-access layer
    ResourceCreated,
    ResourceRead,
    ResourceUpdated,
    ResourceDeleted,
    RecordExported,

    // System events
    SystemStartup,
    SystemShutdown,
}

impl AuditEventType {
    /// Stable dotted code used in the stored entry and in log output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccessGranted => "access.granted",
            Self::AccessDenied => "access.denied",
            Self::ResourceCreated => "resource.created",
            Self::ResourceRead => "resource.read",
            Self::ResourceUpdated => "resource.updated",
            Self::ResourceDeleted => "resource.deleted",
            Self::RecordExported => "record.exported",
            Self::SystemStartup => "system.startup",
            Self::SystemShutdown => "system.shutdown",
        }
    }

    /// Human-readable display name.
    #[must_use]
    pub fn display(&self) -> &'static str {
        match self {
            Self::AccessGranted => "Access Granted",
            Self::AccessDenied => "Access Denied",
            Self::ResourceCreated => "Resource Created",
            Self::ResourceRead => "Resource Read",
            Self::ResourceUpdated => "Resource Updated",
            Self::ResourceDeleted => "Resource Deleted",
            Self::RecordExported => "Record Exported",
            Self::SystemStartup => "System Started",
            Self::SystemShutdown => "System Stopped",
        }
    }
}

// =============================================================================
// Compliance Flags
// =============================================================================

/// Named regulatory concerns attached to an entry. Not mutually
/// exclusive; derived at record time, never set by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceFlag {
    UnauthorizedAccess,
    PhiAccess,
    ExternalAccess,
    DataDeletionPhi,
    AfterHoursAccess,
}

impl ComplianceFlag {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnauthorizedAccess => "unauthorized_access",
            Self::PhiAccess => "phi_access",
            Self::ExternalAccess => "external_access",
            Self::DataDeletionPhi => "data_deletion_phi",
            Self::AfterHoursAccess => "after_hours_access",
        }
    }
}

// =============================================================================
// Audit Event (input)
// =============================================================================

/// Inputs for one audit entry, assembled by the caller.
///
/// The logger derives the entry id, risk score, risk level, and
/// compliance flags at record time; callers never set them.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: AuditEventType,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub actor_id: String,
    /// Institution affiliation of the acting principal; `None` marks the
    /// event as external access.
    pub institution_id: Option<String>,
    pub action: ActionVerb,
    pub allowed: bool,
    pub classifications: Vec<DataClassification>,
    pub occurred_at: OffsetDateTime,
    pub source: RequestSource,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    /// Start building an event of the given type.
    #[must_use]
    pub fn builder(event_type: AuditEventType) -> AuditEventBuilder {
        AuditEventBuilder::new(event_type)
    }
}

/// Builder for [`AuditEvent`] inputs.
#[derive(Debug, Clone)]
pub struct AuditEventBuilder {
    event_type: AuditEventType,
    resource_type: Option<String>,
    resource_id: Option<String>,
    actor_id: Option<String>,
    institution_id: Option<String>,
    action: ActionVerb,
    allowed: bool,
    classifications: Vec<DataClassification>,
    occurred_at: Option<OffsetDateTime>,
    source: RequestSource,
    metadata: HashMap<String, serde_json::Value>,
}

impl AuditEventBuilder {
    #[must_use]
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_type,
            resource_type: None,
            resource_id: None,
            actor_id: None,
            institution_id: None,
            action: ActionVerb::Read,
            allowed: !matches!(event_type, AuditEventType::AccessDenied),
            classifications: Vec::new(),
            occurred_at: None,
            source: RequestSource::default(),
            metadata: HashMap::new(),
        }
    }

    #[must_use]
    pub fn actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    #[must_use]
    pub fn institution(mut self, institution_id: impl Into<String>) -> Self {
        self.institution_id = Some(institution_id.into());
        self
    }

    #[must_use]
    pub fn resource(mut self, resource_type: impl Into<String>, id: Option<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = id;
        self
    }

    #[must_use]
    pub fn action(mut self, action: ActionVerb) -> Self {
        self.action = action;
        self
    }

    #[must_use]
    pub fn allowed(mut self, allowed: bool) -> Self {
        self.allowed = allowed;
        self
    }

    #[must_use]
    pub fn classification(mut self, classification: DataClassification) -> Self {
        self.classifications.push(classification);
        self
    }

    #[must_use]
    pub fn classifications(mut self, classifications: Vec<DataClassification>) -> Self {
        self.classifications = classifications;
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, at: OffsetDateTime) -> Self {
        self.occurred_at = Some(at);
        self
    }

    #[must_use]
    pub fn source(mut self, source: RequestSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Build the event.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidEvent` when the actor or resource type
    /// is missing; an audit entry without an attributable actor is
    /// useless for compliance.
    pub fn build(self) -> Result<AuditEvent> {
        let actor_id = self
            .actor_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AuditError::invalid_event("actor id is required"))?;
        let resource_type = self
            .resource_type
            .filter(|rt| !rt.is_empty())
            .ok_or_else(|| AuditError::invalid_event("resource type is required"))?;

        Ok(AuditEvent {
            event_type: self.event_type,
            resource_type,
            resource_id: self.resource_id,
            actor_id,
            institution_id: self.institution_id,
            action: self.action,
            allowed: self.allowed,
            classifications: self.classifications,
            occurred_at: self.occurred_at.unwrap_or_else(OffsetDateTime::now_utc),
            source: self.source,
            metadata: self.metadata,
        })
    }
}

// =============================================================================
// Audit Log Entry
// =============================================================================

/// One immutable, append-only audit record.
///
/// Created exactly once per recorded event and never updated or deleted.
/// Entries reference actors and resources by id only; a resource may be
/// deleted later while its audit trail persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub event_type: AuditEventType,
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    pub actor_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,

    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<DataClassification>,

    pub action: ActionVerb,
    pub allowed: bool,

    /// Cumulative score the risk level was derived from.
    pub risk_score: u32,
    pub risk_level: RiskLevel,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance_flags: Vec<ComplianceFlag>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,

    #[serde(default)]
    pub source: RequestSource,
}

impl AuditLogEntry {
    /// Returns `true` if the entry carries the given compliance flag.
    #[must_use]
    pub fn has_flag(&self, flag: ComplianceFlag) -> bool {
        self.compliance_flags.contains(&flag)
    }
}
