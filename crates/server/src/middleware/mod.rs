//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span with status and latency)
//! 3. Request ID (reuse or generate `x-request-id`)
//!
//! # Extractors
//!
//! - [`ClientInfo`] - voter identity and user agent from proxy headers

pub mod client;
pub mod request_id;

pub use client::ClientInfo;
pub use request_id::request_id_middleware;
