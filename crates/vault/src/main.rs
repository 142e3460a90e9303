//! `vault-svc`: service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing + optional OTLP).
//! 3. Load and validate the caller-managed key. Without it the process exits.
//! 4. Initialise the S3 client and storage gateway.
//! 5. Build the Axum router and start serving.

mod aws;
mod config;
mod crypto;
mod key;
mod mode;
mod server;
mod storage;
mod telemetry;
mod vault;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use config::Config;
use key::KeyManager;
use server::state::AppState;
use storage::S3Gateway;
use vault::ObjectVault;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        bucket = %cfg.s3_bucket,
        region = %cfg.aws_region,
        "vault-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Caller-managed key
    // -----------------------------------------------------------------------
    let keys = KeyManager::from_env().map_err(|e| {
        error!(error = %e, "caller-managed key invalid; refusing to start");
        e
    })?;
    info!("caller-managed key loaded");

    // -----------------------------------------------------------------------
    // 4. Object store
    // -----------------------------------------------------------------------
    let aws = aws::AwsClients::init(&cfg.aws_region, cfg.s3_endpoint_url.as_deref()).await;
    let store = Arc::new(S3Gateway::new(aws.s3, cfg.s3_bucket.clone()));
    if cfg.default_provider_key_id().is_none() {
        info!("SSE_KMS_KEY_ID not set; provider-managed uploads must supply a key id");
    }

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let vault = ObjectVault::new(store, keys, cfg.default_provider_key_id());
    let state = AppState::new(
        vault,
        cfg.s3_bucket.clone(),
        cfg.list_max_keys,
        cfg.max_upload_bytes,
    );
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
