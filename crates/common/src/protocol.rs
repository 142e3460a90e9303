//! Request and response types exchanged over the public HTTP API.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upload endpoint
// ---------------------------------------------------------------------------

/// Successful response body for `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Key the object was stored under, e.g. `"caller/notes.txt"`.
    pub storage_key: String,
    /// Protection mode applied: `"caller"` or `"provider"`.
    pub mode: String,
    /// Sanitised base name of the uploaded file.
    pub original_name: String,
    /// Number of bytes handed to the object store.
    pub size: usize,
    /// `s3://<bucket>/<storage_key>` location of the stored object.
    pub location: String,
    /// Base64 of the stored envelope, truncated for display.
    /// Only present for caller-managed uploads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciphertext_preview: Option<String>,
}

// ---------------------------------------------------------------------------
// List endpoint
// ---------------------------------------------------------------------------

/// Query string accepted by `GET /list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Key prefix to list under; empty lists the whole bucket.
    #[serde(default)]
    pub prefix: String,
    /// Upper bound on returned keys; capped by server configuration.
    #[serde(default)]
    pub max: Option<i32>,
}

/// Response body for `GET /list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    /// Prefix the listing was taken under.
    pub prefix: String,
    /// Storage keys found under the prefix.
    pub keys: Vec<String>,
}

// ---------------------------------------------------------------------------
// Download endpoint
// ---------------------------------------------------------------------------

/// Query string accepted by `GET /download`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadQuery {
    /// Storage key of the object to fetch.
    #[serde(default)]
    pub key: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: String,
    /// Whether the caller-managed key is loaded.
    pub key_loaded: bool,
    /// Bucket the service reads and writes.
    pub bucket: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceError;

    #[test]
    fn upload_response_omits_missing_preview() {
        let resp = UploadResponse {
            storage_key: "provider/report.pdf".into(),
            mode: "provider".into(),
            original_name: "report.pdf".into(),
            size: 4,
            location: "s3://bucket/provider/report.pdf".into(),
            ciphertext_preview: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("ciphertext_preview").is_none());
        assert_eq!(json["storage_key"], "provider/report.pdf");
    }

    #[test]
    fn list_query_defaults() {
        let q: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.prefix, "");
        assert!(q.max.is_none());
    }

    #[test]
    fn error_response_from_service_error() {
        let e = ErrorResponse::from(&ServiceError::DecryptionFailure);
        assert_eq!(e.code, "decryption_failed");
        assert_eq!(e.message, "cannot decrypt object");
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            key_loaded: true,
            bucket: "my-bucket".into(),
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert!(decoded.key_loaded);
        assert_eq!(decoded.bucket, "my-bucket");
    }
}
