//! HTTP middleware stack for the accounts API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with method, URI, status, latency)
//! 3. Request ID (record on span, tag Sentry scope, echo in response)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
