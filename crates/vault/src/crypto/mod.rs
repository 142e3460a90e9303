//! AES-256-GCM envelope encryption for caller-managed objects.
//!
//! This module is intentionally free of AWS and HTTP dependencies.
//!
//! # Envelope format
//!
//! ```text
//! byte 0..12   nonce (96-bit, fresh from the OS CSPRNG per seal)
//! byte 12..    ciphertext || 16-byte GCM tag
//! ```
//!
//! There is no length prefix or version byte: nonce and tag lengths are fixed
//! by the single supported construction, so an empty plaintext seals to
//! exactly [`MIN_ENVELOPE_LEN`] bytes.

pub mod envelope;

pub use envelope::{open, seal, CryptoError, KEY_LEN};

/// Value of the `cipher` metadata tag attached to caller-managed objects.
pub const CIPHER_NAME: &str = "aes-256-gcm";
