//! [`CustomerKey`]: the caller-managed AES-256 key and its validation errors.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::KEY_LEN;

use super::CUSTOMER_KEY_ENV;

/// Errors produced while loading the caller-managed key.
///
/// None of the variants carry key material or decoder diagnostics, since the
/// latter can echo characters of the secret.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No secret was supplied.
    #[error("{CUSTOMER_KEY_ENV} not set")]
    Missing,

    /// The secret is not valid standard-alphabet base64.
    #[error("{CUSTOMER_KEY_ENV} is not valid base64")]
    Decode,

    /// The decoded secret has the wrong length.
    #[error("{CUSTOMER_KEY_ENV} must decode to {KEY_LEN} bytes (AES-256), got {0}")]
    WrongLength(usize),
}

/// Fixed-size buffer holding exactly [`KEY_LEN`] bytes of key material.
///
/// Not `Clone`: the process holds a single instance, shared behind an `Arc`
/// by [`KeyManager`](super::KeyManager). The bytes are zeroed on drop.
pub struct CustomerKey(Box<[u8; KEY_LEN]>);

impl CustomerKey {
    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WrongLength`] unless `bytes` is exactly [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() != KEY_LEN {
            return Err(ConfigError::WrongLength(bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Decode a standard-alphabet base64 secret into a key.
    ///
    /// Surrounding whitespace (e.g. a trailing newline from a secrets file) is ignored.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] for an empty secret, [`ConfigError::Decode`] for
    /// invalid base64 and [`ConfigError::WrongLength`] for anything not decoding
    /// to [`KEY_LEN`] bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, ConfigError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(ConfigError::Missing);
        }
        let decoded = Zeroizing::new(STANDARD.decode(encoded).map_err(|_| ConfigError::Decode)?);
        Self::from_bytes(&decoded)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for CustomerKey {
    fn drop(&mut self) {
        (*self.0).zeroize();
    }
}

impl std::fmt::Debug for CustomerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("CustomerKey([REDACTED])")
    }
}
