//! Sealing and opening of `nonce || ciphertext+tag` envelopes.
//!
//! **Do NOT reuse a nonce.** GCM nonce reuse under one key breaks both
//! confidentiality and authentication; every [`seal`] draws a fresh nonce.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use thiserror::Error;

use crate::key::CustomerKey;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest well-formed envelope: nonce plus the tag of an empty plaintext.
pub const MIN_ENVELOPE_LEN: usize = NONCE_LEN + TAG_LEN;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The input is too short to contain a nonce.
    #[error("envelope truncated: shorter than {NONCE_LEN}-byte nonce")]
    Truncated,

    /// The tag did not verify. Wrong key and corrupted data are not told apart.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// AES-GCM refused to encrypt (plaintext beyond the GCM length limit).
    #[error("aead encryption failed")]
    SealFailed,
}

/// A parsed envelope: the nonce and the AEAD output it protects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the authentication tag appended.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Split wire bytes into nonce and ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Truncated`] if `bytes` is shorter than [`NONCE_LEN`].
    pub fn parse(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < NONCE_LEN {
            return Err(CryptoError::Truncated);
        }
        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Encode to the `nonce || ciphertext+tag` wire layout.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }
}

/// Encrypt `plaintext` under `key` and return the envelope bytes.
///
/// A random 96-bit nonce is generated per call via the OS CSPRNG. No
/// associated data is authenticated.
///
/// # Errors
///
/// Returns [`CryptoError::SealFailed`] on an internal AEAD error (unreachable
/// for plaintexts below the GCM limit of roughly 64 GiB).
pub fn seal(key: &CustomerKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = build_cipher(key);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::SealFailed)?;

    Ok(Envelope { nonce, ciphertext }.into_bytes())
}

/// Verify and decrypt envelope bytes produced by [`seal`].
///
/// # Errors
///
/// Returns [`CryptoError::Truncated`] if the input cannot hold a nonce and
/// [`CryptoError::AuthenticationFailed`] for any tag mismatch. No partial
/// plaintext is ever returned.
pub fn open(key: &CustomerKey, envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let envelope = Envelope::parse(envelope)?;
    build_cipher(key)
        .decrypt(Nonce::from_slice(&envelope.nonce), envelope.ciphertext.as_ref())
        .map_err(|_| CryptoError::AuthenticationFailed)
}

fn build_cipher(key: &CustomerKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}
