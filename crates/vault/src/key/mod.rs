//! Caller-managed key loading and process-lifetime ownership.
//!
//! # Lifecycle
//!
//! 1. At startup, [`KeyManager::from_env`] reads [`CUSTOMER_KEY_ENV`], decodes
//!    it and checks it is exactly 32 bytes. Any failure is fatal: the server
//!    must not start without a valid key.
//! 2. The key is held in an `Arc` for the rest of the process and handed out
//!    by shared reference via [`KeyManager::current`]. There is no setter;
//!    replacing the key requires a restart.
//! 3. The key bytes are zeroed when the last handle is dropped at exit.
//!
//! # Security invariants
//!
//! - The key is **never** persisted, logged, or included in traces.

pub mod material;

pub use material::{ConfigError, CustomerKey};

use std::sync::Arc;

/// Environment variable holding the base64-encoded caller-managed key.
pub const CUSTOMER_KEY_ENV: &str = "CUSTOMER_KEY_BASE64";

/// Read-only holder of the process-wide [`CustomerKey`].
///
/// Cloning is cheap and every clone refers to the same key, so the manager can
/// be shared across request handlers without locking.
#[derive(Clone, Debug)]
pub struct KeyManager {
    key: Arc<CustomerKey>,
}

impl KeyManager {
    /// Validate `secret` and take ownership of the resulting key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `secret` is `None` or blank, and
    /// the decoding errors of [`CustomerKey::from_base64`] otherwise.
    pub fn initialize(secret: Option<&str>) -> Result<Self, ConfigError> {
        let secret = secret.ok_or(ConfigError::Missing)?;
        let key = CustomerKey::from_base64(secret)?;
        Ok(Self::from(key))
    }

    /// Initialise from the [`CUSTOMER_KEY_ENV`] environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var(CUSTOMER_KEY_ENV).ok();
        Self::initialize(secret.as_deref())
    }

    /// Borrow the process-wide key.
    pub fn current(&self) -> &CustomerKey {
        &self.key
    }
}

impl From<CustomerKey> for KeyManager {
    fn from(key: CustomerKey) -> Self {
        Self { key: Arc::new(key) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KEY_LEN;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[test]
    fn missing_secret_is_rejected() {
        assert_eq!(KeyManager::initialize(None).unwrap_err(), ConfigError::Missing);
        assert_eq!(KeyManager::initialize(Some("")).unwrap_err(), ConfigError::Missing);
    }

    #[test]
    fn initialize_and_borrow() {
        let secret = STANDARD.encode([0x42u8; KEY_LEN]);
        let manager = KeyManager::initialize(Some(&secret)).unwrap();
        assert_eq!(manager.current().as_bytes(), &[0x42u8; KEY_LEN]);
    }

    #[test]
    fn clones_share_one_key() {
        let secret = STANDARD.encode([0x07u8; KEY_LEN]);
        let manager = KeyManager::initialize(Some(&secret)).unwrap();
        let clone = manager.clone();
        assert!(std::ptr::eq(manager.current(), clone.current()));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let secret = STANDARD.encode([0u8; 16]);
        assert_eq!(
            KeyManager::initialize(Some(&secret)).unwrap_err(),
            ConfigError::WrongLength(16)
        );
    }
}
