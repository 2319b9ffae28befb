use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use schdiff_compare::{DiffField, DiffStatus, SearchFilter, read_report, write_report};

use super::Outcome;
use crate::{Config, GlobalArgs, output};

/// Search a difference report exported by sch-compare.
///
/// Without any filter option only size differences are shown.
#[derive(Parser, Debug)]
#[command(name = "sch-search", version)]
pub struct SearchArgs {
    /// Report to read (default: schema_differences.json)
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Export the matching records to a JSON file
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Only records with this status: different or missing_in_db
    #[arg(long)]
    pub status: Option<DiffStatus>,

    /// Only records of this table
    #[arg(long, value_name = "NAME")]
    pub table: Option<String>,

    /// Only records whose file and database values differ in this field
    #[arg(long, value_name = "FIELD")]
    pub mismatch: Option<DiffField>,

    /// Only records whose file size is not this value
    #[arg(long, value_name = "SIZE")]
    pub size_not: Option<String>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl SearchArgs {
    pub fn filter(&self) -> SearchFilter {
        SearchFilter {
            status: self.status,
            table: self.table.clone(),
            mismatch: self.mismatch,
            size_not: self.size_not.clone(),
        }
        .or_size_mismatches()
    }

    pub fn execute(&self, config: &Config, out: &mut dyn Write) -> Result<Outcome> {
        let input = config.report_input(self.input.as_deref());
        let records = read_report(&input)?;

        let found = self.filter().apply(&records);
        tracing::info!(
            input = %input.display(),
            total = records.len(),
            matched = found.len(),
            "report searched"
        );

        output::write_search_results(out, &found)?;
        if let Some(path) = &self.output {
            write_report(path, &found)?;
            writeln!(out, "Results exported to {}", path.display())?;
        }
        Ok(Outcome::Success)
    }
}
