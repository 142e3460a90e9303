//! Tracing setup: structured JSON logs, plus optional OTLP span export.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, key material, nonces, or ciphertext** may appear in any
//!   span attribute or log field. Storage keys and mode labels are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), and
//!   `RUST_LOG` takes precedence when set.

pub mod init;

pub use init::init_telemetry;
