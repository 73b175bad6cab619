//! Policy evaluation for medical resource access.
//!
//! The engine turns (actor, operation requirements, request) into an
//! allow/deny decision with a reason and a risk level, applying a fixed
//! rule ladder in a fixed order. Every evaluation records exactly one
//! audit entry before the decision is returned; if the audit write
//! fails, the evaluation fails.

pub mod decision;
pub mod engine;
pub mod error;
mod rules;

pub use decision::PolicyDecision;
pub use engine::PolicyEngine;
pub use error::{PolicyError, Result};
