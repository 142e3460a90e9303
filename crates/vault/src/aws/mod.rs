//! AWS SDK client initialisation for S3.
//!
//! Credentials come from the standard AWS provider chain. An endpoint override
//! allows running against S3-compatible stores (MinIO, LocalStack).

pub mod clients;

pub use clients::AwsClients;
