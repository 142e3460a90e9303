//! Configuration loading and validation for the vault service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.
//!
//! The caller-managed key is not part of [`Config`]; see [`crate::key`].

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated vault service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bucket objects are stored in. **Required.**
    pub s3_bucket: String,

    /// AWS region of the bucket.
    #[serde(default = "default_aws_region")]
    pub aws_region: String,

    /// Endpoint override for S3-compatible stores.
    #[serde(default)]
    pub s3_endpoint_url: Option<String>,

    /// Provider key id used for provider-managed uploads that do not name one.
    #[serde(default)]
    pub sse_kms_key_id: Option<String>,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Largest number of keys returned by one listing.
    #[serde(default = "default_list_max_keys")]
    pub list_max_keys: i32,

    /// OTLP endpoint for span export. Export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_aws_region() -> String {
    "us-east-1".into()
}
fn default_port() -> u16 {
    8080
}
fn default_max_upload_bytes() -> usize {
    20 << 20
}
fn default_list_max_keys() -> i32 {
    100
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.s3_bucket, "S3_BUCKET")?;
        ensure_non_empty(&self.aws_region, "AWS_REGION")?;

        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be > 0");
        }
        if !(1..=1000).contains(&self.list_max_keys) {
            anyhow::bail!("LIST_MAX_KEYS must be between 1 and 1000");
        }
        Ok(())
    }

    /// Provider key id, if one is configured and non-blank.
    pub fn default_provider_key_id(&self) -> Option<String> {
        self.sse_kms_key_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
