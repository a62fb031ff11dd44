//! Run command implementation.

use super::output::{format_text, JsonMatchResult};
use super::{CliError, OutputFormat};
use std::io;
use std::path::PathBuf;
use warcode::engine::scenario::MatchFile;
use warcode::log::{EventLog, TracingLog, WriterLog};
use warcode::sandbox::{AgentSpec, ProcessConfig, ProcessFactory};
use warcode::{run_match, MatchConfig};

/// Arguments of the run command.
#[derive(Debug)]
pub(crate) struct RunOptions {
    /// Match file.
    pub(crate) map: PathBuf,
    /// RED runtime and path.
    pub(crate) red: (String, PathBuf),
    /// BLUE runtime and path.
    pub(crate) blue: (String, PathBuf),
    /// Id seed.
    pub(crate) seed: Option<u64>,
    /// Turn limit.
    pub(crate) turns: u32,
    /// Result format.
    pub(crate) format: OutputFormat,
    /// Suppress the event log.
    pub(crate) quiet: bool,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the match file or an agent cannot be loaded.
pub(crate) fn execute(options: RunOptions) -> Result<(), CliError> {
    let file = MatchFile::load(&options.map)?;
    let map_name = file.map.name.clone();

    // Generate seed if not provided
    let seed = options.seed.unwrap_or_else(rand::random);

    let config = MatchConfig {
        max_turns: options.turns,
        seed,
        ..MatchConfig::default()
    };

    let (red_runtime, red_path) = options.red;
    let (blue_runtime, blue_path) = options.blue;
    let factory = ProcessFactory::new(
        AgentSpec::new(red_runtime, red_path),
        AgentSpec::new(blue_runtime, blue_path),
        ProcessConfig::default(),
    )?;

    // Text mode streams the event log to stdout; otherwise it goes to tracing.
    let log: Box<dyn EventLog> = match (options.format, options.quiet) {
        (OutputFormat::Text, false) => {
            println!("Running '{map_name}' with seed {seed}...");
            println!();
            Box::new(WriterLog::new(io::stdout()))
        }
        _ => Box::new(TracingLog),
    };

    let result = run_match(file, Box::new(factory), config, log)?;

    match options.format {
        OutputFormat::Text => {
            if !options.quiet {
                println!();
            }
            print!("{}", format_text(&result, &map_name, seed));
        }
        OutputFormat::Json => {
            let json = JsonMatchResult::new(&result, &map_name, seed);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
