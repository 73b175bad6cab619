//! The policy evaluation engine.

use std::sync::Arc;

use medlock_audit::{AuditEvent, AuditEventType, AuditLogger};
use medlock_core::{AccessRequest, Actor, OperationRequirements};

use crate::decision::PolicyDecision;
use crate::error::Result;
use crate::rules;

/// Evaluates access requests against the rule ladder.
///
/// Stateless apart from the injected audit logger: no request leaves a
/// trace in the engine, so one instance serves any number of concurrent
/// evaluations. Every call records exactly one audit entry, and the
/// decision is not released to the caller until that entry is durably
/// written (audit-before-decision-delivery).
pub struct PolicyEngine {
    audit: Arc<AuditLogger>,
}

impl PolicyEngine {
    #[must_use]
    pub fn new(audit: Arc<AuditLogger>) -> Self {
        Self { audit }
    }

    /// Evaluate one access request.
    ///
    /// Returns the decision, allowed or denied, as data. The rule
    /// ladder runs in its fixed order and the first failing rule
    /// determines the reason and risk level.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Audit` when the audit entry cannot be
    /// recorded; no decision is returned in that case.
    pub async fn evaluate(
        &self,
        actor: &Actor,
        requirements: &OperationRequirements,
        request: &AccessRequest,
    ) -> Result<PolicyDecision> {
        let decision = match rules::first_violation(actor, requirements, request) {
            Some(violation) => {
                tracing::debug!(
                    actor_id = %actor.id,
                    resource_type = %request.resource_type,
                    action = %request.action,
                    reason = %violation.reason,
                    risk = %violation.risk,
                    "access denied"
                );
                PolicyDecision::deny(violation.reason, violation.risk)
            }
            None => {
                if rules::flagged_after_hours(request) {
                    tracing::debug!(
                        actor_id = %actor.id,
                        resource_type = %request.resource_type,
                        "after-hours access permitted; flagged in the audit trail"
                    );
                }
                PolicyDecision::allow()
            }
        };

        let event = self.audit_event(actor, requirements, request, &decision)?;
        self.audit.record(event).await?;

        Ok(decision)
    }

    /// Assemble the audit event for a decided request.
    fn audit_event(
        &self,
        actor: &Actor,
        requirements: &OperationRequirements,
        request: &AccessRequest,
        decision: &PolicyDecision,
    ) -> Result<AuditEvent> {
        let event_type = if decision.allowed {
            AuditEventType::AccessGranted
        } else {
            AuditEventType::AccessDenied
        };

        let mut builder = AuditEvent::builder(event_type)
            .actor(actor.id.clone())
            .resource(request.resource_type.clone(), request.resource_id.clone())
            .action(request.action)
            .allowed(decision.allowed)
            .classifications(requirements.classifications.clone())
            .occurred_at(request.occurred_at)
            .source(request.source.clone())
            .metadata(
                "decisionRiskLevel",
                serde_json::json!(decision.risk_level),
            );

        if let Some(institution_id) = &actor.institution_id {
            builder = builder.institution(institution_id.clone());
        }
        if let Some(patient_id) = &request.patient_id {
            builder = builder.metadata("patientId", serde_json::json!(patient_id));
        }
        if let Some(resource_institution) = &request.institution_id {
            builder = builder.metadata(
                "resourceInstitutionId",
                serde_json::json!(resource_institution),
            );
        }
        if let Some(reason) = &decision.reason {
            builder = builder.metadata("denialReason", serde_json::json!(reason));
        }
        for (key, value) in &request.metadata {
            builder = builder.metadata(key.clone(), value.clone());
        }

        Ok(builder.build()?)
    }
}
