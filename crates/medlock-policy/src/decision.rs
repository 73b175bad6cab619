//! The outcome of one policy evaluation.

use serde::{Deserialize, Serialize};

use medlock_core::RiskLevel;

/// Result of evaluating one access request.
///
/// Produced once per evaluation and never mutated afterwards. A denial
/// is data, not an error: `reason` names the first failed rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDecision {
    pub allowed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub risk_level: RiskLevel,
}

impl PolicyDecision {
    /// A clean allow.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            risk_level: RiskLevel::Low,
        }
    }

    /// A denial with the failed rule's reason and risk grading.
    #[must_use]
    pub fn deny(reason: impl Into<String>, risk_level: RiskLevel) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            risk_level,
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    #[must_use]
    pub fn is_denied(&self) -> bool {
        !self.allowed
    }
}
