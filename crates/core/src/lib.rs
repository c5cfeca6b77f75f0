//! Catalog Importer Core - Shared types library.
//!
//! This crate provides the domain types used across all catalog importer
//! components:
//! - `importer` - HTTP service that pages the remote catalog and imports products
//! - `cli` - Command-line tools for browsing and importing
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Shopify global IDs, opaque cursors, prices, import status and
//!   the page view state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
