//! Transparent field-level cryptography for classified attributes.
//!
//! Individual sensitive values are encrypted, decrypted, and hashed
//! independently of how the containing record is stored: every encoded
//! value carries its own nonce and authentication tag, so a single field
//! can be decrypted without any external state beyond the process key.

pub mod cipher;
pub mod config;
pub mod error;
pub mod hashing;
mod keys;

pub use cipher::{EncryptedValue, FieldCipher};
pub use config::{CryptoConfig, SECRET_ENV_VAR};
pub use error::{CryptoError, Result};
pub use hashing::HashedValue;
