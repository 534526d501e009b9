use skymodel_format::OutputFormat;

use crate::cli_types::ExportArgs;
use crate::commands::{load, save};
use crate::error::CliError;

pub(crate) fn run_export(args: ExportArgs) -> Result<(), CliError> {
    let table = load(&args.skymodel)?;
    let format = args
        .format
        .map_or_else(|| OutputFormat::from_path(&args.output), Into::into);
    save(&table, &args.output, format)
}
