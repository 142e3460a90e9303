//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::vault::ObjectVault;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so that Axum can clone the state for each
/// request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Vault performing mode routing and storage.
    pub vault: ObjectVault,
    /// Bucket name, reported in upload locations and health output.
    pub bucket: Arc<String>,
    /// Upper bound for `GET /list`.
    pub list_max_keys: i32,
    /// Request body limit for `POST /upload`.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create a new [`AppState`].
    pub fn new(
        vault: ObjectVault,
        bucket: String,
        list_max_keys: i32,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            vault,
            bucket: Arc::new(bucket),
            list_max_keys,
            max_upload_bytes,
        }
    }
}
