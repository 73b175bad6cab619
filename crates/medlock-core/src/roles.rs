//! Medical role vocabulary shared by the policy engine and audit logger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles an authenticated actor may hold.
///
/// The role set is closed by design: policy rules key off these variants
/// and a free-form role string would make the rule ladder unenforceable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalRole {
    /// Cross-institution operator; exempt from tenant isolation.
    PlatformAdmin,
    /// Administrator of a single institution.
    InstitutionAdmin,
    Doctor,
    Nurse,
    Specialist,
    Oncologist,
    /// Research access; restricted to business hours.
    Researcher,
    /// Lab staff; restricted to business hours.
    LabTechnician,
    /// Front-desk staff; restricted to business hours.
    Receptionist,
    /// A patient accessing their own record.
    Patient,
}

impl MedicalRole {
    /// Roles allowed through the protected-health-data gate.
    #[must_use]
    pub fn is_clinical(&self) -> bool {
        matches!(
            self,
            Self::Doctor
                | Self::Nurse
                | Self::Specialist
                | Self::Oncologist
                | Self::InstitutionAdmin
        )
    }

    /// Roles that may only access the system during business hours.
    #[must_use]
    pub fn is_business_hours_only(&self) -> bool {
        matches!(
            self,
            Self::Researcher | Self::LabTechnician | Self::Receptionist
        )
    }

    /// Returns the stable string code used in logs and audit entries.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PlatformAdmin => "platform_admin",
            Self::InstitutionAdmin => "institution_admin",
            Self::Doctor => "doctor",
            Self::Nurse => "nurse",
            Self::Specialist => "specialist",
            Self::Oncologist => "oncologist",
            Self::Researcher => "researcher",
            Self::LabTechnician => "lab_technician",
            Self::Receptionist => "receptionist",
            Self::Patient => "patient",
        }
    }
}

impl fmt::Display for MedicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clinical_roles() {
        assert!(MedicalRole::Doctor.is_clinical());
        assert!(MedicalRole::Nurse.is_clinical());
        assert!(MedicalRole::Specialist.is_clinical());
        assert!(MedicalRole::Oncologist.is_clinical());
        assert!(MedicalRole::InstitutionAdmin.is_clinical());

        assert!(!MedicalRole::PlatformAdmin.is_clinical());
        assert!(!MedicalRole::Researcher.is_clinical());
        assert!(!MedicalRole::Patient.is_clinical());
    }

    #[test]
    fn test_business_hours_roles() {
        assert!(MedicalRole::Researcher.is_business_hours_only());
        assert!(MedicalRole::LabTechnician.is_business_hours_only());
        assert!(MedicalRole::Receptionist.is_business_hours_only());

        assert!(!MedicalRole::Doctor.is_business_hours_only());
        assert!(!MedicalRole::Patient.is_business_hours_only());
        assert!(!MedicalRole::PlatformAdmin.is_business_hours_only());
    }

    #[test]
    fn test_serde_codes_match_display() {
        for role in [
            MedicalRole::PlatformAdmin,
            MedicalRole::InstitutionAdmin,
            MedicalRole::Doctor,
            MedicalRole::Nurse,
            MedicalRole::Specialist,
            MedicalRole::Oncologist,
            MedicalRole::Researcher,
            MedicalRole::LabTechnician,
            MedicalRole::Receptionist,
            MedicalRole::Patient,
        ] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
    }
}
