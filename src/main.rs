//! Warcode CLI - Command-line interface for running Warcode matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Warcode - A turn-based robot match engine
#[derive(Parser, Debug)]
#[command(name = "warcode")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log engine internals at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a match between two agents
    Run {
        /// Match file (JSON)
        #[arg(required = true)]
        map: PathBuf,

        /// RED agent: code directory (python) or executable
        #[arg(long)]
        red: PathBuf,

        /// BLUE agent: code directory (python) or executable
        #[arg(long)]
        blue: PathBuf,

        /// RED agent runtime: python or executable
        #[arg(long, default_value = "python")]
        red_runtime: String,

        /// BLUE agent runtime: python or executable
        #[arg(long, default_value = "python")]
        blue_runtime: String,

        /// Seed for new entity ids (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum turns (default: 1000)
        #[arg(short, long, default_value = "1000")]
        turns: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the turn-by-turn event log
        #[arg(short, long)]
        quiet: bool,
    },

    /// Validate a match file
    Validate {
        /// Match file (JSON)
        #[arg(required = true)]
        map: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            map,
            red,
            blue,
            red_runtime,
            blue_runtime,
            seed,
            turns,
            format,
            quiet,
        } => cli::run::execute(cli::run::RunOptions {
            map,
            red: (red_runtime, red),
            blue: (blue_runtime, blue),
            seed,
            turns,
            format,
            quiet,
        }),

        Commands::Validate { map } => cli::validate::execute(&map),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
