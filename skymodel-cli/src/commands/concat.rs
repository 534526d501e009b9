use skymodel_format::OutputFormat;
use skymodel_lib::{ConcatenateOptions, concatenate};

use crate::cli_types::ConcatArgs;
use crate::commands::{load, report_merge, save};
use crate::error::CliError;

pub(crate) fn run_concat(args: ConcatArgs) -> Result<(), CliError> {
    let mut table = load(&args.skymodel)?;
    let other = load(&args.skymodel2)?;
    let opts = ConcatenateOptions {
        match_by: args.match_by.into(),
        radius: args.radius,
        keep: args.keep_matches.into(),
    };

    let summary = concatenate(&mut table, &other, &opts)?;
    report_merge(&summary, table.row_count());
    save(&table, &args.out_file, OutputFormat::from_path(&args.out_file))
}
