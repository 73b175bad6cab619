//! Per-request context handed to the policy engine.
//!
//! An [`AccessRequest`] is derived from route parameters and the request
//! body by the calling layer; it is ephemeral and never persisted.
//! [`OperationRequirements`] is the explicit per-operation declaration of
//! role, classification, and tenancy constraints, passed into evaluation
//! as configuration rather than discovered from attributes.

use std::collections::HashMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::classification::DataClassification;
use crate::error::{CoreError, Result};
use crate::roles::MedicalRole;

// =============================================================================
// Action Verb
// =============================================================================

/// The operation being attempted on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionVerb {
    Create,
    Read,
    Update,
    Delete,
    Search,
    Export,
}

impl ActionVerb {
    /// Returns `true` for verbs that change stored state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Search => "search",
            Self::Export => "export",
        }
    }
}

impl std::fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Request Source
// =============================================================================

/// Client metadata captured for the audit trail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<IpAddr>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

// =============================================================================
// Access Request
// =============================================================================

/// Everything the policy engine needs to know about one access attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    /// Resource type name (e.g. "MedicalRecord", "LabResult").
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// Patient the resource belongs to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    /// Institution that owns the resource, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,

    pub action: ActionVerb,

    /// When the request was made, in the caller's local offset. The
    /// engine and risk scorer read hour and weekday from this value
    /// instead of consulting the system clock.
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,

    #[serde(default)]
    pub source: RequestSource,

    /// Free-form context forwarded into the audit entry.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl AccessRequest {
    /// Create a request for the given resource type and action.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyResourceType` for an empty type name.
    pub fn new(
        resource_type: impl Into<String>,
        action: ActionVerb,
        occurred_at: OffsetDateTime,
    ) -> Result<Self> {
        let resource_type = resource_type.into();
        if resource_type.is_empty() {
            return Err(CoreError::EmptyResourceType);
        }
        Ok(Self {
            resource_type,
            resource_id: None,
            patient_id: None,
            institution_id: None,
            action,
            occurred_at,
            source: RequestSource::default(),
            metadata: HashMap::new(),
        })
    }

    #[must_use]
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    #[must_use]
    pub fn with_institution(mut self, institution_id: impl Into<String>) -> Self {
        self.institution_id = Some(institution_id.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: RequestSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

// =============================================================================
// Operation Requirements
// =============================================================================

/// Declared constraints for one operation.
///
/// Replaces per-route annotations with explicit configuration: the
/// calling layer maps each operation identifier to one of these and
/// passes it into evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequirements {
    /// Roles that may perform the operation; empty means unrestricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_roles: Vec<MedicalRole>,

    /// Data classifications touched by the operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<DataClassification>,

    /// Whether the operation requires an institution affiliation.
    #[serde(default)]
    pub institution_required: bool,
}

impl OperationRequirements {
    /// An operation with no declared constraints.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// An operation touching data of the given classification.
    #[must_use]
    pub fn for_classification(classification: DataClassification) -> Self {
        Self {
            classifications: vec![classification],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_roles(mut self, roles: Vec<MedicalRole>) -> Self {
        self.required_roles = roles;
        self
    }

    #[must_use]
    pub fn with_classification(mut self, classification: DataClassification) -> Self {
        self.classifications.push(classification);
        self
    }

    #[must_use]
    pub fn institution_scoped(mut self) -> Self {
        self.institution_required = true;
        self
    }

    /// Returns `true` if the operation touches the given classification.
    #[must_use]
    pub fn includes(&self, classification: DataClassification) -> bool {
        self.classifications.contains(&classification)
    }

    /// Returns `true` if the operation touches protected health data.
    #[must_use]
    pub fn touches_phi(&self) -> bool {
        self.includes(DataClassification::Phi)
    }
}
