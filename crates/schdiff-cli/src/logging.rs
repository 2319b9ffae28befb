//! Logging setup for the schdiff binaries
//!
//! Events go to stderr so stdout carries only reports. `RUST_LOG` takes
//! precedence over the verbosity flags.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: [&str; 4] = [
    "schdiff_core",
    "schdiff_storage",
    "schdiff_compare",
    "schdiff_cli",
];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
    /// Whether to include file/line information in logs
    pub include_location: bool,
    /// Whether to colorize output
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_verbosity(0, false)
    }
}

impl LoggingConfig {
    /// Maps `-q` / `-v` counts to a filter.
    ///
    /// Warnings are always shown unless quiet; each `-v` raises the level
    /// of the schdiff crates by one step.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let default_filter = if quiet {
            "error".to_string()
        } else {
            match verbose {
                0 => "warn".to_string(),
                1 => crate_filter("info"),
                2 => crate_filter("debug"),
                _ => crate_filter("trace"),
            }
        };

        Self {
            default_filter,
            include_location: verbose >= 2,
            ansi: std::io::stderr().is_terminal(),
        }
    }
}

fn crate_filter(level: &str) -> String {
    let mut filter = String::from("warn");
    for name in CRATES {
        filter.push_str(&format!(",{name}={level}"));
    }
    filter
}

/// Installs the global subscriber. Fails if one is already set.
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.include_location)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_ansi(config.ansi)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).try_init()?;
    Ok(())
}
