use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use skymodel_format::OutputFormat;
use skymodel_lib::{add, concatenate, parse_column_values};

use crate::commands::{load, report_merge, save};
use crate::error::CliError;
use crate::steps::{Step, StepFile, concatenate_options};

/// Apply every step of a step file to the model it names, in order.
///
/// Steps share one in-memory model. A concatenate step only writes when it
/// has an `out_file`; an add step without one rewrites the input model.
pub(crate) fn run_steps(path: &Path) -> Result<(), CliError> {
    let file = StepFile::load(path)?;
    let mut table = load(&file.skymodel)?;

    for (i, step) in file.steps.iter().enumerate() {
        log::info!(
            "{} {}: {}",
            "Step".if_supports_color(Stdout, |t| t.bold()),
            i + 1,
            step.name().if_supports_color(Stdout, |t| t.cyan()),
        );
        match step {
            Step::Concatenate {
                skymodel2,
                match_by,
                radius,
                keep_matches,
                out_file,
            } => {
                let opts =
                    concatenate_options(match_by.as_deref(), *radius, keep_matches.as_deref())?;
                let other = load(skymodel2)?;
                let summary = concatenate(&mut table, &other, &opts)?;
                report_merge(&summary, table.row_count());
                if let Some(out) = out_file {
                    save(&table, out, OutputFormat::from_path(out))?;
                }
            }
            Step::Add { columns, out_file } => {
                let pairs: Vec<(&str, String)> = columns
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.to_literal()))
                    .collect();
                add(&mut table, &parse_column_values(&pairs)?)?;
                let out = out_file.as_deref().unwrap_or(file.skymodel.as_path());
                save(&table, out, OutputFormat::from_path(out))?;
            }
        }
    }
    Ok(())
}
