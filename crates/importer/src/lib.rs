//! Catalog importer library.
//!
//! Pages a remote Shopify catalog, marks which products already exist in the
//! merchant's store, and imports selected products on request. The binary in
//! `main.rs` serves this over HTTP; the CLI and integration tests use it
//! directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
