//! AES-256-GCM field cipher.
//!
//! Every value is encrypted with a fresh random nonce and a fixed
//! additional-authenticated-data tag naming the protected-field domain,
//! so a ciphertext lifted from another context fails authentication.
//! The encoded form embeds nonce, ciphertext, and GCM tag; each value is
//! independently decryptable with nothing but the process key.

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use medlock_core::DataClassification;

use crate::config::CryptoConfig;
use crate::error::{CryptoError, Result};
use crate::hashing::{HashedValue, hash_identifier};
use crate::keys::{derive_field_key, derive_index_key};

/// AES-GCM standard nonce size.
const NONCE_SIZE: usize = 12;

/// Domain tag bound into every ciphertext as associated data.
const FIELD_AAD: &[u8] = b"medlock/field/v1";

/// Storage prefix of the encoded form.
pub const ENCODED_PREFIX: &str = "$enc$v1$";

// =============================================================================
// Encrypted Value
// =============================================================================

/// A self-describing encrypted field value: nonce + ciphertext (the GCM
/// tag is appended to the ciphertext). Replaced wholesale on every
/// write, never partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedValue {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

impl EncryptedValue {
    /// Returns `true` if the string carries the encoded-value prefix.
    #[must_use]
    pub fn is_encoded(value: &str) -> bool {
        value.starts_with(ENCODED_PREFIX)
    }
}

impl fmt::Display for EncryptedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ENCODED_PREFIX}{}${}",
            URL_SAFE_NO_PAD.encode(self.nonce),
            URL_SAFE_NO_PAD.encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedValue {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix(ENCODED_PREFIX)
            .ok_or_else(|| CryptoError::encoding("missing $enc$v1$ prefix"))?;
        let (nonce_part, ciphertext_part) = body
            .split_once('$')
            .ok_or_else(|| CryptoError::encoding("missing nonce/ciphertext separator"))?;

        let nonce_bytes = URL_SAFE_NO_PAD
            .decode(nonce_part)
            .map_err(|e| CryptoError::encoding(format!("invalid nonce encoding: {e}")))?;
        let nonce: [u8; NONCE_SIZE] = nonce_bytes
            .try_into()
            .map_err(|_| CryptoError::encoding("nonce must be 12 bytes"))?;

        let ciphertext = URL_SAFE_NO_PAD
            .decode(ciphertext_part)
            .map_err(|e| CryptoError::encoding(format!("invalid ciphertext encoding: {e}")))?;

        Ok(Self { nonce, ciphertext })
    }
}

// =============================================================================
// Field Cipher
// =============================================================================

/// Encrypts, decrypts, and hashes individual field values.
///
/// Constructed once at startup and shared by reference; holds only the
/// two derived process keys, both immutable, so concurrent use from any
/// number of request handlers is safe.
pub struct FieldCipher {
    field_key: Zeroizing<[u8; 32]>,
    index_key: Zeroizing<[u8; 32]>,
}

impl FieldCipher {
    /// Derive the process keys and build the cipher.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyDerivation` if key derivation fails.
    pub fn new(config: &CryptoConfig) -> Result<Self> {
        let cipher = Self {
            field_key: derive_field_key(&config.secret)?,
            index_key: derive_index_key(&config.secret)?,
        };
        tracing::debug!("field cipher initialized; process keys derived");
        Ok(cipher)
    }

    /// Encrypt a plaintext field value.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encryption` on cipher failure. The input is
    /// never returned unencrypted.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedValue> {
        let cipher = Aes256Gcm::new_from_slice(self.field_key.as_slice())
            .map_err(|e| CryptoError::encryption(format!("cipher init failed: {e}")))?;

        let mut nonce = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: FIELD_AAD,
                },
            )
            .map_err(|_| CryptoError::encryption("AEAD encryption failed"))?;

        Ok(EncryptedValue { nonce, ciphertext })
    }

    /// Decrypt an encrypted field value.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Decryption` when authentication fails (wrong
    /// key, tampered ciphertext, or foreign domain tag) or the plaintext
    /// is not valid UTF-8.
    pub fn decrypt(&self, value: &EncryptedValue) -> Result<String> {
        let cipher = Aes256Gcm::new_from_slice(self.field_key.as_slice())
            .map_err(|e| CryptoError::decryption(format!("cipher init failed: {e}")))?;

        let plaintext = cipher
            .decrypt(
                Nonce::from_slice(&value.nonce),
                Payload {
                    msg: value.ciphertext.as_ref(),
                    aad: FIELD_AAD,
                },
            )
            .map_err(|_| CryptoError::decryption("AEAD authentication failed"))?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::decryption("plaintext is not valid UTF-8"))
    }

    /// Parse and decrypt an encoded string value.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encoding` for a malformed encoding and
    /// `CryptoError::Decryption` for an authentication failure.
    pub fn decrypt_str(&self, encoded: &str) -> Result<String> {
        let value: EncryptedValue = encoded.parse()?;
        self.decrypt(&value)
    }

    /// One-way salted digest of an identifier, for equality lookups.
    #[must_use]
    pub fn hash(&self, identifier: &str) -> HashedValue {
        hash_identifier(&self.index_key, identifier)
    }

    /// Encode a field value for storage according to its classification.
    ///
    /// Values classified PHI or PII are encrypted and encoded; other
    /// classifications pass through unchanged. Already-encoded values are
    /// left as-is so repeated writes stay idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encryption` on cipher failure.
    pub fn protect(&self, classification: DataClassification, value: &str) -> Result<String> {
        if !classification.requires_encryption() || EncryptedValue::is_encoded(value) {
            return Ok(value.to_string());
        }
        Ok(self.encrypt(value)?.to_string())
    }

    /// Decode a stored field value according to its classification.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encoding` when a classification that
    /// requires encryption holds a value without the encoded prefix
    /// (such a field was stored unprotected and must not be served as if
    /// it were), and `CryptoError::Decryption` on authentication failure.
    pub fn reveal(&self, classification: DataClassification, stored: &str) -> Result<String> {
        if EncryptedValue::is_encoded(stored) {
            return self.decrypt_str(stored);
        }
        if classification.requires_encryption() {
            return Err(CryptoError::encoding(format!(
                "{classification} field holds an unencrypted value"
            )));
        }
        Ok(stored.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> FieldCipher {
        let config = CryptoConfig::new("test-secret").unwrap();
        FieldCipher::new(&config).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = test_cipher();
        let value = cipher.encrypt("123-45-6789").unwrap();
        assert_eq!(cipher.decrypt(&value).unwrap(), "123-45-6789");
    }

    #[test]
    fn test_fresh_nonce_per_value() {
        let cipher = test_cipher();
        let a = cipher.encrypt("same input").unwrap();
        let b = cipher.encrypt("same input").unwrap();

        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
        assert_eq!(cipher.decrypt(&a).unwrap(), "same input");
        assert_eq!(cipher.decrypt(&b).unwrap(), "same input");
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let cipher = test_cipher();
        let mut value = cipher.encrypt("integrity check").unwrap();
        value.ciphertext[0] ^= 0x01;

        assert!(matches!(
            cipher.decrypt(&value),
            Err(CryptoError::Decryption(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let cipher = test_cipher();
        let other = FieldCipher::new(&CryptoConfig::new("other-secret").unwrap()).unwrap();

        let value = cipher.encrypt("cross-key").unwrap();
        assert!(matches!(
            other.decrypt(&value),
            Err(CryptoError::Decryption(_))
        ));
    }

    #[test]
    fn test_encoded_string_roundtrip() {
        let cipher = test_cipher();
        let value = cipher.encrypt("national-id-9876").unwrap();
        let encoded = value.to_string();

        assert!(encoded.starts_with(ENCODED_PREFIX));
        assert!(EncryptedValue::is_encoded(&encoded));

        let parsed: EncryptedValue = encoded.parse().unwrap();
        assert_eq!(parsed, value);
        assert_eq!(cipher.decrypt_str(&encoded).unwrap(), "national-id-9876");
    }

    #[test]
    fn test_malformed_encodings_rejected() {
        for bad in [
            "plaintext",
            "$enc$v1$",
            "$enc$v1$AAAA",
            "$enc$v1$!!!$AAAA",
            "$enc$v2$AAAA$AAAA",
        ] {
            assert!(
                matches!(
                    bad.parse::<EncryptedValue>(),
                    Err(CryptoError::Encoding(_))
                ),
                "expected encoding error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_empty_and_unicode_plaintext() {
        let cipher = test_cipher();
        for plaintext in ["", "Grüße, Dr. Müller 🩺"] {
            let value = cipher.encrypt(plaintext).unwrap();
            assert_eq!(cipher.decrypt(&value).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_protect_encrypts_only_sensitive_classifications() {
        let cipher = test_cipher();

        let phi = cipher
            .protect(DataClassification::Phi, "diagnosis: C50.9")
            .unwrap();
        assert!(EncryptedValue::is_encoded(&phi));

        let pii = cipher.protect(DataClassification::Pii, "jane doe").unwrap();
        assert!(EncryptedValue::is_encoded(&pii));

        let internal = cipher
            .protect(DataClassification::Internal, "ward 4")
            .unwrap();
        assert_eq!(internal, "ward 4");
    }

    #[test]
    fn test_protect_is_idempotent() {
        let cipher = test_cipher();
        let once = cipher.protect(DataClassification::Phi, "value").unwrap();
        let twice = cipher.protect(DataClassification::Phi, &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reveal_roundtrip() {
        let cipher = test_cipher();
        let stored = cipher
            .protect(DataClassification::Phi, "diagnosis: C50.9")
            .unwrap();
        assert_eq!(
            cipher.reveal(DataClassification::Phi, &stored).unwrap(),
            "diagnosis: C50.9"
        );
        assert_eq!(
            cipher.reveal(DataClassification::Public, "open data").unwrap(),
            "open data"
        );
    }

    #[test]
    fn test_reveal_rejects_unprotected_sensitive_field() {
        let cipher = test_cipher();
        assert!(matches!(
            cipher.reveal(DataClassification::Phi, "stored in the clear"),
            Err(CryptoError::Encoding(_))
        ));
    }

    #[test]
    fn test_serde_struct_roundtrip() {
        let cipher = test_cipher();
        let value = cipher.encrypt("serialized").unwrap();
        let json = serde_json::to_string(&value).unwrap();
        let back: EncryptedValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        assert_eq!(cipher.decrypt(&back).unwrap(), "serialized");
    }
}
