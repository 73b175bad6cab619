//! Risk scoring and compliance-flag derivation.
//!
//! Scoring is independent of the policy engine's own risk grading:
//! audit-worthy events also originate outside policy evaluation (domain
//! events, exports), so the logger derives risk from the event inputs
//! alone. Weights and thresholds are fixed; changing them would make
//! historical entries incomparable.

use medlock_core::{ActionVerb, DataClassification, RiskLevel, is_after_hours};

use crate::entry::{AuditEvent, ComplianceFlag};

const WEIGHT_PHI: u32 = 3;
const WEIGHT_PII: u32 = 2;
const WEIGHT_DENIED: u32 = 5;
const WEIGHT_AFTER_HOURS: u32 = 1;
const WEIGHT_DELETE: u32 = 3;
const WEIGHT_UPDATE: u32 = 1;
const WEIGHT_NO_INSTITUTION: u32 = 2;

const THRESHOLD_CRITICAL: u32 = 8;
const THRESHOLD_HIGH: u32 = 5;
const THRESHOLD_MEDIUM: u32 = 2;

/// Cumulative risk score for an event.
#[must_use]
pub fn risk_score(event: &AuditEvent) -> u32 {
    let mut score = 0;

    if event.classifications.contains(&DataClassification::Phi) {
        score += WEIGHT_PHI;
    }
    if event.classifications.contains(&DataClassification::Pii) {
        score += WEIGHT_PII;
    }
    if !event.allowed {
        score += WEIGHT_DENIED;
    }
    if is_after_hours(event.occurred_at) {
        score += WEIGHT_AFTER_HOURS;
    }
    match event.action {
        ActionVerb::Delete => score += WEIGHT_DELETE,
        ActionVerb::Update => score += WEIGHT_UPDATE,
        _ => {}
    }
    if event.institution_id.is_none() {
        score += WEIGHT_NO_INSTITUTION;
    }

    score
}

/// Map a cumulative score to its risk level.
#[must_use]
pub fn level_for_score(score: u32) -> RiskLevel {
    match score {
        s if s >= THRESHOLD_CRITICAL => RiskLevel::Critical,
        s if s >= THRESHOLD_HIGH => RiskLevel::High,
        s if s >= THRESHOLD_MEDIUM => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// Derive the compliance flags for an event.
#[must_use]
pub fn compliance_flags(event: &AuditEvent) -> Vec<ComplianceFlag> {
    let mut flags = Vec::new();
    let touches_phi = event.classifications.contains(&DataClassification::Phi);

    if !event.allowed {
        flags.push(ComplianceFlag::UnauthorizedAccess);
    }
    if touches_phi {
        flags.push(ComplianceFlag::PhiAccess);
    }
    if event.institution_id.is_none() {
        flags.push(ComplianceFlag::ExternalAccess);
    }
    if event.action == ActionVerb::Delete && touches_phi {
        flags.push(ComplianceFlag::DataDeletionPhi);
    }
    if is_after_hours(event.occurred_at) {
        flags.push(ComplianceFlag::AfterHoursAccess);
    }

    flags
}
