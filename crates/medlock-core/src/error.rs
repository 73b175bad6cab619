use thiserror::Error;

/// Core error types for Medlock vocabulary validation
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Actor id must not be empty")]
    EmptyActorId,

    #[error("Actor must hold at least one medical role")]
    EmptyRoles,

    #[error("Resource type must not be empty")]
    EmptyResourceType,

    #[error("Invalid action verb: {0}")]
    InvalidAction(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidAction error
    pub fn invalid_action(action: impl Into<String>) -> Self {
        Self::InvalidAction(action.into())
    }

    /// Check if this error is a caller error (bad input) rather than
    /// an internal failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyActorId
                | Self::EmptyRoles
                | Self::EmptyResourceType
                | Self::InvalidAction(_)
        )
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
