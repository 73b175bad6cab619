//! Process-key derivation.
//!
//! Both keys are derived once at startup from the configured secret via
//! Argon2id with fixed parameters and a fixed domain salt, so the same
//! secret always yields the same keys. The derived material lives in
//! zeroizing buffers for the process lifetime and is never persisted.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};

/// Domain salt for the AEAD field key.
const FIELD_KEY_SALT: &[u8] = b"medlock.field-key.v1";

/// Domain salt for the identifier-hash key.
const INDEX_KEY_SALT: &[u8] = b"medlock.index-key.v1";

/// Argon2id memory cost in KiB (19 MiB, OWASP baseline).
const KDF_MEMORY_KIB: u32 = 19_456;

/// Argon2id iteration count. Fixed so key derivation is deterministic
/// across processes sharing one secret.
const KDF_ITERATIONS: u32 = 2;

const KDF_PARALLELISM: u32 = 1;

fn derive(secret: &str, salt: &[u8]) -> Result<Zeroizing<[u8; 32]>> {
    let params = Params::new(KDF_MEMORY_KIB, KDF_ITERATIONS, KDF_PARALLELISM, Some(32))
        .map_err(|e| CryptoError::key_derivation(format!("invalid KDF parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(secret.as_bytes(), salt, key.as_mut_slice())
        .map_err(|e| CryptoError::key_derivation(format!("argon2 derivation failed: {e}")))?;
    Ok(key)
}

/// Derive the AES-256-GCM field key.
pub(crate) fn derive_field_key(secret: &str) -> Result<Zeroizing<[u8; 32]>> {
    derive(secret, FIELD_KEY_SALT)
}

/// Derive the salted identifier-hash key.
pub(crate) fn derive_index_key(secret: &str) -> Result<Zeroizing<[u8; 32]>> {
    derive(secret, INDEX_KEY_SALT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_field_key("test-secret").unwrap();
        let b = derive_field_key("test-secret").unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn test_different_secrets_yield_different_keys() {
        let a = derive_field_key("secret-one").unwrap();
        let b = derive_field_key("secret-two").unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_field_and_index_keys_are_independent() {
        let field = derive_field_key("test-secret").unwrap();
        let index = derive_index_key("test-secret").unwrap();
        assert_ne!(*field, *index);
    }
}
