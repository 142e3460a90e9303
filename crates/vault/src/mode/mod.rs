//! Protection-mode selection on write and mode reconstruction on read.
//!
//! # Storage contract
//!
//! | Mode            | Key namespace | Stored bytes     | `cipher` metadata |
//! |-----------------|---------------|------------------|-------------------|
//! | ProviderManaged | `provider/`   | plaintext        | absent            |
//! | CallerManaged   | `caller/`     | sealed envelope  | `aes-256-gcm`     |
//!
//! On read the `cipher` tag is authoritative; the `caller/` namespace is only a
//! fallback for objects whose metadata was stripped, and never overrides an
//! explicit tag.
//!
//! # Module invariants
//!
//! - **Stateless.** Every function here is a pure transformation over its
//!   arguments plus the read-only key, safe to call from any number of tasks.
//! - **No storage access.** Fetching and storing bytes belongs to `crate::vault`.

pub mod read;
pub mod write;

pub use read::{route_read, StoredMode};
pub use write::route_write;

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::crypto::CryptoError;

/// Key namespace for caller-managed objects.
pub const CALLER_PREFIX: &str = "caller/";

/// Key namespace for provider-managed objects.
pub const PROVIDER_PREFIX: &str = "provider/";

/// Metadata key naming the client-side cipher.
pub const CIPHER_META_KEY: &str = "cipher";

/// Metadata key holding the sanitised upload name.
pub const ORIGINAL_NAME_META_KEY: &str = "original_name";

/// Object metadata as exchanged with the store.
pub type Metadata = HashMap<String, String>;

/// Protection mode requested for a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionMode {
    /// The store encrypts at rest with the given provider key id.
    ProviderManaged {
        /// Opaque key identifier passed through to the store.
        key_id: String,
    },
    /// This process seals the bytes before they leave memory.
    CallerManaged,
}

impl EncryptionMode {
    /// Parse the mode named in an upload request.
    ///
    /// Accepts `caller` / `customer` and `provider` / `sse-kms`. A missing
    /// `key_id` yields an empty id, which [`route_write`] rejects.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::UnknownMode`] for any other method name.
    pub fn from_request(method: &str, key_id: Option<&str>) -> Result<Self, ModeError> {
        match method.trim() {
            "caller" | "customer" => Ok(Self::CallerManaged),
            "provider" | "sse-kms" => Ok(Self::ProviderManaged {
                key_id: key_id.unwrap_or_default().trim().to_owned(),
            }),
            other => Err(ModeError::UnknownMode(other.to_owned())),
        }
    }

    /// Short label used in responses and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProviderManaged { .. } => "provider",
            Self::CallerManaged => "caller",
        }
    }
}

impl fmt::Display for EncryptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Caller input errors. They reject a single request and nothing else.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    /// Provider-managed mode was requested without a key id.
    #[error("provider-managed mode requires a key id")]
    MissingKeyId,

    /// The requested (or recorded) mode is not one this service knows.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// The object name has no usable final path component.
    #[error("invalid object name")]
    InvalidName,
}

/// Failure of a routing step: bad input, or a seal/open failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error(transparent)]
    Mode(#[from] ModeError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
