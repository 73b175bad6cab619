pub mod actor;
pub mod classification;
pub mod context;
pub mod error;
pub mod hours;
pub mod risk;
pub mod roles;

pub use actor::{Actor, ActorStatus};
pub use classification::DataClassification;
pub use context::{AccessRequest, ActionVerb, OperationRequirements, RequestSource};
pub use error::{CoreError, Result};
pub use hours::is_after_hours;
pub use risk::RiskLevel;
pub use roles::MedicalRole;
