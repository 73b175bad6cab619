//! Salted one-way hashing of identifier fields.
//!
//! Hashed identifiers (e.g. national IDs) remain searchable by equality:
//! the digest is deterministic for a given secret, keyed with a derived
//! salt so raw identifiers cannot be brute-forced from a rainbow table.
//! Search by a hashed field is a linear scan over candidate records;
//! there is no index over digests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, Result};

/// Storage prefix of a hashed identifier.
pub const HASHED_PREFIX: &str = "$hsh$v1$";

/// A salted, one-way digest of an identifier field. Used only for
/// equality lookups, never for display, and never invertible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashedValue(String);

impl HashedValue {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the string carries the hashed-value prefix.
    #[must_use]
    pub fn is_encoded(value: &str) -> bool {
        value.starts_with(HASHED_PREFIX)
    }
}

impl fmt::Display for HashedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HashedValue {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        let digest = s
            .strip_prefix(HASHED_PREFIX)
            .ok_or_else(|| CryptoError::encoding("missing $hsh$v1$ prefix"))?;
        if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CryptoError::encoding("digest must be 64 hex characters"));
        }
        Ok(Self(s.to_string()))
    }
}

/// Digest an identifier with the derived index key as salt.
pub(crate) fn hash_identifier(key: &[u8; 32], identifier: &str) -> HashedValue {
    let mut hasher = Sha256::new();
    hasher.update(key);
    hasher.update(identifier.as_bytes());
    HashedValue(format!("{HASHED_PREFIX}{}", hex::encode(hasher.finalize())))
}
