//! Catalog importer CLI.
//!
//! # Usage
//!
//! ```bash
//! # Show the first catalog page with import status
//! catalog-cli pages
//!
//! # Walk three pages forward from a cursor, as JSON
//! catalog-cli pages --cursor eyJsYXN0X2lkIjo0fQ== --count 3 --json
//!
//! # Import a product from the first page
//! catalog-cli import --handle slides
//! ```
//!
//! Reads the same environment as the importer service (`SHOPIFY_STORE`,
//! `SHOPIFY_ADMIN_ACCESS_TOKEN`, `CATALOG_ENDPOINT`, ...).

#![cfg_attr(not(test), forbid(unsafe_code))]

use catalog_importer::config::ImporterConfig;
use catalog_importer::state::AppState;
use catalog_importer_core::{Cursor, Direction};
use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Browse the remote catalog and import products")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog pages with import status
    Pages {
        /// Opaque cursor to start from (omit for the first page)
        #[arg(short, long)]
        cursor: Option<String>,

        /// `next` or `previous`
        #[arg(short, long, default_value = "next")]
        direction: Direction,

        /// Number of pages to walk
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Import one product by handle from a catalog page
    Import {
        /// Handle of the product to import
        #[arg(long)]
        handle: String,

        /// Cursor of the page the product is on (omit for the first page)
        #[arg(short, long)]
        cursor: Option<String>,

        /// `next` or `previous`
        #[arg(short, long, default_value = "next")]
        direction: Direction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_importer=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ImporterConfig::from_env()?;
    let state = AppState::new(&config)?;

    match cli.command {
        Commands::Pages {
            cursor,
            direction,
            count,
            json,
        } => {
            commands::pages::list(
                state.fetcher(),
                Cursor::from_param(cursor),
                direction,
                count,
                json,
            )
            .await?;
        }
        Commands::Import {
            handle,
            cursor,
            direction,
        } => {
            commands::import::run(&state, Cursor::from_param(cursor), direction, handle).await?;
        }
    }
    Ok(())
}
