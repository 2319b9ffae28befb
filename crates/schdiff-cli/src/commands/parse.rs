use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use schdiff_compare::write_json;
use schdiff_core::SchParser;
use schdiff_storage::SchemaStore;

use super::Outcome;
use crate::{Config, GlobalArgs, output};

/// Parse a .sch schema file and store its definitions
#[derive(Parser, Debug)]
#[command(name = "sch-parser", version)]
pub struct ParseArgs {
    /// Path to schema file (e.g. ds.sch)
    pub schema_file: PathBuf,

    /// SQLite database file (default: schema.db)
    #[arg(long, env = "SCHDIFF_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Drop the stored schema and save the new one in its place
    #[arg(long)]
    pub reset: bool,

    /// Fail on malformed lines instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Also write the parsed schema to a JSON file
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Only print this table after saving
    #[arg(long, value_name = "NAME")]
    pub table: Option<String>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl ParseArgs {
    pub fn execute(&self, config: &Config, out: &mut dyn Write) -> Result<Outcome> {
        let db_path = config.store_path(self.db.as_deref());
        let parser = SchParser::with_mode(config.parse_mode(self.strict));

        let parsed = parser
            .parse_file(&self.schema_file)
            .with_context(|| format!("Failed to parse {}", self.schema_file.display()))?;
        if parsed.report.has_skipped() {
            tracing::warn!(
                skipped = parsed.report.skipped_lines.len(),
                "malformed lines were skipped"
            );
        }

        let mut store = SchemaStore::open(&db_path)?;
        if self.reset {
            store
                .replace(&parsed.schema)
                .with_context(|| format!("Failed to reset {}", db_path.display()))?;
            writeln!(
                out,
                "Database reset and new schema saved to {}",
                db_path.display()
            )?;
        } else {
            store
                .save(&parsed.schema)
                .with_context(|| format!("Failed to save schema to {}", db_path.display()))?;
            writeln!(out, "Successfully exported schema to {}", db_path.display())?;
        }

        if let Some(path) = &self.export_json {
            write_json(path, &parsed.schema)?;
            writeln!(out, "Schema exported to {}", path.display())?;
        }

        let stored = store.load()?;
        output::write_schema(out, &stored, self.table.as_deref())?;
        Ok(Outcome::Success)
    }
}
