//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Translate multipart uploads and query strings into vault calls.
//! - Map vault errors onto JSON error bodies without leaking crypto detail.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
