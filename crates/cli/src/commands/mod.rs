//! CLI subcommands.

pub mod import;
pub mod pages;

use catalog_importer::config::ConfigError;
use catalog_importer::services::{FetchError, ImportError};
use catalog_importer::shopify::ShopifyError;
use thiserror::Error;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("client setup: {0}")]
    Client(#[from] ShopifyError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("output: {0}")]
    Output(#[from] serde_json::Error),
}
