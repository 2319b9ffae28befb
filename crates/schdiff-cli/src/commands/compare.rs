use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use schdiff_compare::{DiffField, SchemaComparator, write_report};
use schdiff_core::SchParser;
use schdiff_storage::{LiveDatabase, SchemaStore};

use super::Outcome;
use crate::{Config, GlobalArgs, output};

/// Compare a .sch schema file with the stored (or live) database schema
#[derive(Parser, Debug)]
#[command(name = "sch-compare", version)]
pub struct CompareArgs {
    /// Path to schema file (e.g. ds.sch)
    pub schema_file: PathBuf,

    /// SQLite database file (default: schema.db)
    #[arg(long, env = "SCHDIFF_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Export differences to a JSON file instead of printing them
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Fail on malformed lines instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Compare against the database's own tables instead of stored definitions
    #[arg(long)]
    pub live: bool,

    /// Match table and column names regardless of case
    #[arg(long)]
    pub case_insensitive: bool,

    /// Attribute to leave out of the comparison: type, size or position
    #[arg(long = "ignore", value_name = "FIELD")]
    pub ignore: Vec<DiffField>,

    /// Exit with status 1 when differences are found
    #[arg(long)]
    pub fail_on_diff: bool,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl CompareArgs {
    pub fn execute(&self, config: &Config, out: &mut dyn Write) -> Result<Outcome> {
        let db_path = config.store_path(self.db.as_deref());
        let file = SchParser::with_mode(config.parse_mode(self.strict))
            .parse_file(&self.schema_file)
            .with_context(|| format!("Failed to parse {}", self.schema_file.display()))?
            .schema;

        let comparator =
            SchemaComparator::with_config(config.compare_config(self.case_insensitive, &self.ignore));
        let report = if self.live {
            let live = LiveDatabase::open(&db_path)?;
            comparator.compare_with(&file, &live)?
        } else {
            let store = SchemaStore::open_read_only(&db_path)?;
            comparator.compare_with(&file, &store)?
        };

        match config.report_output(self.json.as_deref()) {
            Some(path) => {
                write_report(&path, report.records())?;
                writeln!(out, "{}", output::summary(&report))?;
                writeln!(out, "Differences exported to {}", path.display())?;
            }
            None => output::write_differences(out, &report)?,
        }

        if self.fail_on_diff && !report.is_empty() {
            return Ok(Outcome::DifferencesFound);
        }
        Ok(Outcome::Success)
    }
}
