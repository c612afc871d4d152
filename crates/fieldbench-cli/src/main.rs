#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::needless_pass_by_value)]

mod commands;
mod logging;

use clap::Parser;
use commands::MeasureArgs;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fieldbench")]
#[command(author, version, about = "Whole-element vs single-field write-back benchmark", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Load measurement settings from a JSON file (flags override it)
    #[arg(long, global = true, value_name = "FILE", env = "FIELDBENCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Measure both write-back strategies and report the speedup
    Compare {
        #[command(flatten)]
        measure: MeasureArgs,
    },

    /// Measure a single write-back strategy
    Run {
        /// Write-back strategy: "whole" or "single"
        #[arg(long, short = 's')]
        strategy: String,

        #[command(flatten)]
        measure: MeasureArgs,
    },

    /// Check that both strategies produce identical sequences
    Verify {
        /// Number of records in the sequence
        #[arg(long, short = 'n', default_value_t = commands::DEFAULT_ELEMENTS)]
        elements: usize,

        /// RNG seed for the sequence and the per-pair draws
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.json);

    let Some(command) = cli.command else {
        // No subcommand: same as `compare` with defaults.
        let config = commands::load_config(cli.config.as_deref(), &MeasureArgs::default())?;
        return commands::compare::run(commands::DEFAULT_ELEMENTS, &config, cli.json);
    };

    match command {
        Commands::Version => commands::version::run(),
        Commands::Compare { measure } => {
            let config = commands::load_config(cli.config.as_deref(), &measure)?;
            commands::compare::run(measure.elements, &config, cli.json)
        }
        Commands::Run { strategy, measure } => {
            let config = commands::load_config(cli.config.as_deref(), &measure)?;
            commands::run::run(&strategy, measure.elements, &config, cli.json)
        }
        Commands::Verify { elements, seed } => {
            let config = commands::load_config(cli.config.as_deref(), &MeasureArgs::default())?;
            commands::verify::run(elements, seed.unwrap_or(config.seed), cli.json)
        }
    }
}
