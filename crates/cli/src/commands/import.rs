//! Single product import.

use catalog_importer::services::ImportCommand;
use catalog_importer::state::AppState;
use catalog_importer_core::{Cursor, Direction};

use super::CliError;

/// Import `handle` from the page at `cursor`.
#[allow(clippy::print_stdout)]
pub async fn run(
    state: &AppState,
    cursor: Option<Cursor>,
    direction: Direction,
    handle: String,
) -> Result<(), CliError> {
    let command = ImportCommand {
        cursor,
        direction,
        handle,
    };

    tracing::info!(handle = %command.handle, "Importing product");
    let created = state
        .reconciler()
        .import_command(state.fetcher(), &command)
        .await?;

    println!("Imported {} as {} (draft)", created.handle, created.id);
    Ok(())
}
