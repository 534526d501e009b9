use skymodel_format::OutputFormat;
use skymodel_lib::{add, parse_column_values};

use crate::cli_types::AddArgs;
use crate::commands::{load, save};
use crate::error::CliError;

pub(crate) fn run_add(args: AddArgs) -> Result<(), CliError> {
    let mut table = load(&args.skymodel)?;
    let values = parse_column_values(&args.columns)?;
    add(&mut table, &values)?;

    let out = args.out_file.as_deref().unwrap_or(args.skymodel.as_path());
    save(&table, out, OutputFormat::from_path(out))
}
