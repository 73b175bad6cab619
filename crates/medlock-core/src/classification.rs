//! Data sensitivity classification attached to resources and fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sensitivity classification of a resource or an individual field.
///
/// Drives both the policy rule ladder and the at-rest encryption
/// requirements. Unclassified fields default to `Internal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataClassification {
    /// Protected Health Information: clinical data, strictest controls.
    Phi,
    /// Personally Identifiable Information: identifying but non-clinical.
    Pii,
    /// Operational data with no external exposure.
    #[default]
    Internal,
    /// Freely disclosable data.
    Public,
}

impl DataClassification {
    /// Whether values carrying this classification must be encrypted at rest.
    #[must_use]
    pub fn requires_encryption(&self) -> bool {
        matches!(self, Self::Phi | Self::Pii)
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Phi => "PHI",
            Self::Pii => "PII",
            Self::Internal => "INTERNAL",
            Self::Public => "PUBLIC",
        }
    }
}

impl fmt::Display for DataClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
