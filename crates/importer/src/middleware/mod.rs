//! HTTP middleware stack for the importer.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans carrying `request_id`)
//! 3. Request ID (correlate logs, Sentry events and responses)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
