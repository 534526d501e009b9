//! skymodel CLI
//!
//! Command-line interface for merging, editing and exporting makesourcedb
//! sky models.

mod cli_types;
mod commands;
mod error;
mod steps;

use clap::Parser;
use log::LevelFilter;

use cli_types::{Cli, Commands};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli.command) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Concat(args) => commands::concat::run_concat(args),
        Commands::Add(args) => commands::add::run_add(args),
        Commands::Export(args) => commands::export::run_export(args),
        Commands::Run { steps } => commands::run::run_steps(&steps),
    }
}

/// Plain messages at info level; timestamps and targets only with --verbose.
/// `RUST_LOG` overrides the level.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if !verbose {
        builder
            .format_timestamp(None)
            .format_target(false)
            .format_level(false);
    }
    builder.parse_default_env().init();
}
