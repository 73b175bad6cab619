//! The rule ladder.
//!
//! Rules are evaluated in the order they appear in [`first_violation`];
//! the first failing rule determines the reported reason and risk. The
//! ordering is part of the contract (tenant isolation is checked before
//! data sensitivity) and must not be rearranged.

use medlock_core::{
    AccessRequest, Actor, MedicalRole, OperationRequirements, RiskLevel, is_after_hours,
};
use time::Weekday;

/// First hour (inclusive) of the business-hours window.
const BUSINESS_DAY_START_HOUR: u8 = 8;

/// First hour (exclusive bound) after the business-hours window.
const BUSINESS_DAY_END_HOUR: u8 = 18;

/// A failed rule: the denial reason and its risk grading.
#[derive(Debug, Clone)]
pub(crate) struct RuleViolation {
    pub reason: String,
    pub risk: RiskLevel,
}

impl RuleViolation {
    fn new(reason: impl Into<String>, risk: RiskLevel) -> Self {
        Self {
            reason: reason.into(),
            risk,
        }
    }
}

/// Apply the ladder; returns the first violation, if any.
pub(crate) fn first_violation(
    actor: &Actor,
    requirements: &OperationRequirements,
    request: &AccessRequest,
) -> Option<RuleViolation> {
    actor_status(actor)
        .or_else(|| required_roles(actor, requirements))
        .or_else(|| institution_requirement(actor, requirements))
        .or_else(|| tenant_isolation(actor, request))
        .or_else(|| phi_gate(actor, requirements, request))
        .or_else(|| temporal_window(actor, request))
        .or_else(|| patient_self_access(actor, request))
}

/// Rule 1: the actor account must be active.
fn actor_status(actor: &Actor) -> Option<RuleViolation> {
    if actor.is_active() {
        return None;
    }
    Some(RuleViolation::new(
        "Actor account is not active",
        RiskLevel::High,
    ))
}

/// Rule 2: the actor must hold one of the operation's required roles.
fn required_roles(actor: &Actor, requirements: &OperationRequirements) -> Option<RuleViolation> {
    if requirements.required_roles.is_empty()
        || actor.has_any_role(&requirements.required_roles)
    {
        return None;
    }
    let wanted: Vec<&str> = requirements
        .required_roles
        .iter()
        .map(MedicalRole::code)
        .collect();
    Some(RuleViolation::new(
        format!("Operation requires one of the roles: {}", wanted.join(", ")),
        RiskLevel::Medium,
    ))
}

/// Rule 3: institution-scoped operations need an affiliation.
fn institution_requirement(
    actor: &Actor,
    requirements: &OperationRequirements,
) -> Option<RuleViolation> {
    if !requirements.institution_required || actor.institution_id.is_some() {
        return None;
    }
    Some(RuleViolation::new(
        "Operation requires an institution affiliation",
        RiskLevel::High,
    ))
}

/// Rule 4: multi-tenancy isolation. A resource owned by another
/// institution is off-limits to everyone but platform admins.
fn tenant_isolation(actor: &Actor, request: &AccessRequest) -> Option<RuleViolation> {
    let resource_institution = request.institution_id.as_deref()?;
    if actor.institution_id.as_deref() == Some(resource_institution)
        || actor.has_role(MedicalRole::PlatformAdmin)
    {
        return None;
    }
    Some(RuleViolation::new(
        "Cross-institution access denied: resource belongs to another institution",
        RiskLevel::Critical,
    ))
}

/// Rule 5: protected-health-data gate. PHI operations require a
/// clinical role, and the actor must belong to the resource's
/// institution when one is declared.
fn phi_gate(
    actor: &Actor,
    requirements: &OperationRequirements,
    request: &AccessRequest,
) -> Option<RuleViolation> {
    if !requirements.touches_phi() {
        return None;
    }
    if !actor.has_clinical_role() {
        return Some(RuleViolation::new(
            "Protected health information requires a clinical role",
            RiskLevel::Critical,
        ));
    }
    if let Some(resource_institution) = request.institution_id.as_deref()
        && actor.institution_id.as_deref() != Some(resource_institution)
    {
        return Some(RuleViolation::new(
            "Protected health information is restricted to the owning institution",
            RiskLevel::Critical,
        ));
    }
    None
}

/// Rule 6: business-hours restriction. Actors whose every role is
/// business-hours-only are denied outside weekdays 08:00–18:00. Other
/// roles are never denied on time of day; after-hours access by them is
/// flagged by the audit logger instead.
fn temporal_window(actor: &Actor, request: &AccessRequest) -> Option<RuleViolation> {
    if !actor.roles.iter().all(MedicalRole::is_business_hours_only) {
        return None;
    }
    if within_business_hours(request) {
        return None;
    }
    Some(RuleViolation::new(
        "Role is restricted to weekday business hours",
        RiskLevel::Medium,
    ))
}

fn within_business_hours(request: &AccessRequest) -> bool {
    let at = request.occurred_at;
    if matches!(at.weekday(), Weekday::Saturday | Weekday::Sunday) {
        return false;
    }
    (BUSINESS_DAY_START_HOUR..BUSINESS_DAY_END_HOUR).contains(&at.hour())
}

/// Rule 7: self-access. An actor whose only role is patient may access
/// a patient-scoped resource only when it is their own.
fn patient_self_access(actor: &Actor, request: &AccessRequest) -> Option<RuleViolation> {
    if actor.sole_role() != Some(MedicalRole::Patient) {
        return None;
    }
    let patient_id = request.patient_id.as_deref()?;
    if patient_id == actor.id {
        return None;
    }
    Some(RuleViolation::new(
        "Patients may only access their own records",
        RiskLevel::Critical,
    ))
}

/// After-hours accesses that are allowed but audit-flagged.
pub(crate) fn flagged_after_hours(request: &AccessRequest) -> bool {
    is_after_hours(request.occurred_at)
}
