//! Read-side routing: reconstruct the mode an object was written under.
//!
//! Decision table, first match wins:
//!
//! 1. `cipher` metadata is `aes-256-gcm` → caller-managed.
//! 2. `cipher` metadata is any other non-empty value → rejected.
//! 3. Storage key starts with `caller/` → caller-managed.
//! 4. Otherwise → provider-managed; bytes pass through unchanged.

use std::fmt;

use crate::crypto::{self, CIPHER_NAME};
use crate::key::CustomerKey;

use super::{Metadata, ModeError, RouteError, CALLER_PREFIX, CIPHER_META_KEY};

/// Mode an existing object was stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredMode {
    /// The store decrypted the object transparently; no work on our side.
    ProviderManaged,
    /// The stored bytes are an envelope sealed with the customer key.
    CallerManaged,
}

impl StoredMode {
    /// Short label used in responses and log fields.
    pub fn label(self) -> &'static str {
        match self {
            Self::ProviderManaged => "provider",
            Self::CallerManaged => "caller",
        }
    }
}

impl fmt::Display for StoredMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Plaintext recovered from a stored object, with the mode it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub mode: StoredMode,
    pub plaintext: Vec<u8>,
}

/// Apply the decision table to a stored object's key and metadata.
///
/// # Errors
///
/// Returns [`ModeError::UnknownMode`] when the `cipher` tag names a cipher this
/// service does not implement. Such an object is never passed through as-is.
pub fn resolve_mode(storage_key: &str, metadata: &Metadata) -> Result<StoredMode, ModeError> {
    match metadata.get(CIPHER_META_KEY).map(String::as_str) {
        Some(CIPHER_NAME) => Ok(StoredMode::CallerManaged),
        Some(other) if !other.is_empty() => Err(ModeError::UnknownMode(other.to_owned())),
        _ if storage_key.starts_with(CALLER_PREFIX) => Ok(StoredMode::CallerManaged),
        _ => Ok(StoredMode::ProviderManaged),
    }
}

/// Recover the plaintext of a stored object.
///
/// # Errors
///
/// Propagates [`ModeError::UnknownMode`] from [`resolve_mode`], and
/// [`crypto::CryptoError::Truncated`] / [`crypto::CryptoError::AuthenticationFailed`]
/// unchanged when a caller-managed envelope does not open.
pub fn route_read(
    key: &CustomerKey,
    storage_key: &str,
    stored: Vec<u8>,
    metadata: &Metadata,
) -> Result<ReadOutcome, RouteError> {
    let mode = resolve_mode(storage_key, metadata)?;
    let plaintext = match mode {
        StoredMode::CallerManaged => crypto::open(key, &stored)?,
        StoredMode::ProviderManaged => stored,
    };
    Ok(ReadOutcome { mode, plaintext })
}
