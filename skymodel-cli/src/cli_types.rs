//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use skymodel_format::OutputFormat;
use skymodel_lib::{KeepMatches, MatchBy};

#[derive(Parser)]
#[command(name = "skymodel")]
#[command(about = "Merge, edit and export makesourcedb sky models", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Append a second sky model to the first, resolving duplicates
    Concat(ConcatArgs),

    /// Set column values on every source of a sky model
    Add(AddArgs),

    /// Write a sky model as a ds9 region or kvis annotation file
    Export(ExportArgs),

    /// Run the steps listed in a TOML step file
    Run {
        /// Step file
        steps: PathBuf,
    },
}

#[derive(Args, Clone)]
pub(crate) struct ConcatArgs {
    /// Parent sky model
    pub skymodel: PathBuf,

    /// Sky model to append
    pub skymodel2: PathBuf,

    /// Output file; the extension selects the format (.reg, .ann, else sky model)
    #[arg(short, long)]
    pub out_file: PathBuf,

    /// How duplicates are recognised
    #[arg(long, value_enum, default_value_t = MatchByArg::Name)]
    pub match_by: MatchByArg,

    /// Match radius in degrees (position matching only)
    #[arg(long, default_value_t = skymodel_lib::merge::DEFAULT_RADIUS)]
    pub radius: f64,

    /// Which duplicates survive
    #[arg(long, value_enum, default_value_t = KeepArg::All)]
    pub keep_matches: KeepArg,
}

#[derive(Args, Clone)]
pub(crate) struct AddArgs {
    /// Sky model to edit
    pub skymodel: PathBuf,

    /// Column assignment, e.g. ReferenceFrequency=1.5e8 (repeatable)
    #[arg(short, long = "column", value_parser = parse_assignment, required = true)]
    pub columns: Vec<(String, String)>,

    /// Output file (defaults to rewriting the input)
    #[arg(short, long)]
    pub out_file: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub(crate) struct ExportArgs {
    /// Sky model to export
    pub skymodel: PathBuf,

    /// Output file
    pub output: PathBuf,

    /// Output format (defaults to one chosen by the output extension)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum MatchByArg {
    Name,
    Position,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum KeepArg {
    All,
    From1,
    From2,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormatArg {
    Makesourcedb,
    Ds9,
    Kvis,
}

impl From<MatchByArg> for MatchBy {
    fn from(arg: MatchByArg) -> Self {
        match arg {
            MatchByArg::Name => MatchBy::Name,
            MatchByArg::Position => MatchBy::Position,
        }
    }
}

impl From<KeepArg> for KeepMatches {
    fn from(arg: KeepArg) -> Self {
        match arg {
            KeepArg::All => KeepMatches::All,
            KeepArg::From1 => KeepMatches::From1,
            KeepArg::From2 => KeepMatches::From2,
        }
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Makesourcedb => OutputFormat::SkyModel,
            FormatArg::Ds9 => OutputFormat::Ds9,
            FormatArg::Kvis => OutputFormat::Kvis,
        }
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{s}'"))
}
