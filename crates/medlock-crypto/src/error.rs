use thiserror::Error;

/// Errors raised by the field-level encryption codec.
///
/// Encryption and decryption failures must surface to the caller; the
/// codec never falls back to returning a value in plaintext, because a
/// swallowed failure silently stores or renders an unprotected field.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Encryption secret is not configured (set MEDLOCK_ENCRYPTION_SECRET)")]
    MissingSecret,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Invalid encoded value: {0}")]
    Encoding(String),
}

impl CryptoError {
    pub fn key_derivation(message: impl Into<String>) -> Self {
        Self::KeyDerivation(message.into())
    }

    pub fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption(message.into())
    }

    pub fn decryption(message: impl Into<String>) -> Self {
        Self::Decryption(message.into())
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Startup-fatal errors, as opposed to per-value failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingSecret | Self::KeyDerivation(_))
    }
}

/// Convenience result type for codec operations
pub type Result<T> = std::result::Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(CryptoError::MissingSecret.is_configuration());
        assert!(CryptoError::key_derivation("params").is_configuration());
        assert!(!CryptoError::decryption("tag mismatch").is_configuration());
        assert!(!CryptoError::encoding("bad prefix").is_configuration());
    }

    #[test]
    fn test_missing_secret_names_env_var() {
        let message = CryptoError::MissingSecret.to_string();
        assert!(message.contains("MEDLOCK_ENCRYPTION_SECRET"));
    }
}
