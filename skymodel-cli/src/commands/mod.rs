pub(crate) mod add;
pub(crate) mod concat;
pub(crate) mod export;
pub(crate) mod run;

use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use skymodel_core::CatalogTable;
use skymodel_format::{OutputFormat, read_skymodel_file, write_file};
use skymodel_lib::MergeSummary;

use crate::error::CliError;

/// Read a sky model and report its size.
pub(crate) fn load(path: &Path) -> Result<CatalogTable, CliError> {
    let table = read_skymodel_file(path)?;
    log::debug!(
        "Loaded {} sources ({} columns) from {}",
        table.row_count(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Write a table in the given format and report where it went.
pub(crate) fn save(table: &CatalogTable, path: &Path, format: OutputFormat) -> Result<(), CliError> {
    write_file(table, path, format)?;
    log::info!(
        "{} {} sources to {} ({format})",
        "Wrote".if_supports_color(Stdout, |t| t.green()),
        table.row_count(),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

pub(crate) fn report_merge(summary: &MergeSummary, total: usize) {
    log::info!(
        "{} {} sources: {} duplicates removed, {} renamed, {} total",
        "Merged".if_supports_color(Stdout, |t| t.bold()),
        summary.appended,
        summary.removed,
        summary.renamed,
        total,
    );
}
