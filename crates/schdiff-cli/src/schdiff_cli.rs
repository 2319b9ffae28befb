//! Shared plumbing for the `sch-parser`, `sch-compare` and `sch-search`
//! binaries: argument definitions, configuration, logging and output.

pub mod commands;
pub mod config;
pub mod logging;
pub mod output;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args};

pub use commands::{CompareArgs, Outcome, ParseArgs, SearchArgs};
pub use config::Config;

/// Options every binary accepts
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (default: ./schdiff.toml, then the user config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Sets up logging and configuration, runs `command` against stdout and
/// turns any error into a failure exit code.
pub fn run<F>(global: &GlobalArgs, command: F) -> ExitCode
where
    F: FnOnce(&Config, &mut dyn Write) -> anyhow::Result<Outcome>,
{
    if let Err(err) = logging::init(logging::LoggingConfig::from_verbosity(
        global.verbose,
        global.quiet,
    )) {
        eprintln!("warning: logging unavailable: {err:#}");
    }

    let result = Config::load(global.config.as_deref()).and_then(|config| {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let outcome = command(&config, &mut out)?;
        out.flush()?;
        Ok(outcome)
    });

    match result {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
