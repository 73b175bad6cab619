//! The authenticated principal as seen by the access-control core.
//!
//! Actors are owned by the external identity subsystem; the core only
//! reads them. Identity and role membership are trusted inputs here:
//! authentication happens before the core is invoked.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::roles::MedicalRole;

/// Account status of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorStatus {
    Active,
    Suspended,
    Deactivated,
}

/// An authenticated principal requesting access to a medical resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Stable identifier assigned by the identity subsystem.
    pub id: String,

    /// Held medical roles; never empty.
    pub roles: Vec<MedicalRole>,

    /// Institution affiliation, if any. Actors without an affiliation are
    /// treated as external by the audit logger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,

    pub status: ActorStatus,
}

impl Actor {
    /// Create an active actor with the given roles.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyActorId` or `CoreError::EmptyRoles` when
    /// the corresponding invariant is violated.
    pub fn new(id: impl Into<String>, roles: Vec<MedicalRole>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::EmptyActorId);
        }
        if roles.is_empty() {
            return Err(CoreError::EmptyRoles);
        }
        Ok(Self {
            id,
            roles,
            institution_id: None,
            status: ActorStatus::Active,
        })
    }

    /// Set the institution affiliation.
    #[must_use]
    pub fn with_institution(mut self, institution_id: impl Into<String>) -> Self {
        self.institution_id = Some(institution_id.into());
        self
    }

    /// Set the account status.
    #[must_use]
    pub fn with_status(mut self, status: ActorStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ActorStatus::Active
    }

    /// Returns `true` if the actor holds the given role.
    #[must_use]
    pub fn has_role(&self, role: MedicalRole) -> bool {
        self.roles.contains(&role)
    }

    /// Returns `true` if the actor holds at least one of the given roles.
    #[must_use]
    pub fn has_any_role(&self, roles: &[MedicalRole]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }

    /// Returns `true` if the actor holds a clinical role.
    #[must_use]
    pub fn has_clinical_role(&self) -> bool {
        self.roles.iter().any(MedicalRole::is_clinical)
    }

    /// The actor's single role, if they hold exactly one.
    #[must_use]
    pub fn sole_role(&self) -> Option<MedicalRole> {
        match self.roles.as_slice() {
            [role] => Some(*role),
            _ => None,
        }
    }
}
