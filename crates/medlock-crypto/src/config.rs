//! Codec configuration and secret loading.

use std::fmt;

use serde::Deserialize;

use crate::error::{CryptoError, Result};

/// Environment variable holding the raw encryption secret.
pub const SECRET_ENV_VAR: &str = "MEDLOCK_ENCRYPTION_SECRET";

/// Configuration for the field cipher.
///
/// The secret is the only input; both process keys are derived from it
/// at startup. A missing secret is a fatal configuration error; the
/// codec never starts without one.
#[derive(Clone, Deserialize)]
pub struct CryptoConfig {
    pub secret: String,
}

impl CryptoConfig {
    /// Create a configuration from an explicit secret.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MissingSecret` for an empty secret.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CryptoError::MissingSecret);
        }
        Ok(Self { secret })
    }

    /// Load the secret from the process environment.
    ///
    /// Honors a `.env` file when present.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MissingSecret` when the variable is unset
    /// or empty.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let secret = std::env::var(SECRET_ENV_VAR).map_err(|_| CryptoError::MissingSecret)?;
        Self::new(secret)
    }
}

// The secret must never appear in logs or panic output.
impl fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}
