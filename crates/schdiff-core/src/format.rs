//! `.sch` schema file reader
//!
//! One column per line, five caret-terminated fields:
//!
//! ```text
//! customer^email^VARCHAR^255^4^
//! ```
//!
//! Splitting a line on `^` must give exactly six parts, the last one being
//! whatever follows the trailing caret. Lines are trimmed, fields are not.

use std::path::Path;

use crate::{ColumnDef, Schema, SchError, SchResult};

/// Field separator used by `.sch` files
pub const FIELD_DELIMITER: char = '^';

const PART_COUNT: usize = 6;

/// How malformed lines are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Skip malformed lines and record them in the report
    #[default]
    Lenient,
    /// Fail on the first malformed line
    Strict,
}

/// Summary of a parse run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Non-blank lines examined
    pub lines_read: usize,
    /// Columns added to the schema
    pub columns: usize,
    /// 1-based line numbers of skipped lines (malformed or reusing a position)
    pub skipped_lines: Vec<usize>,
}

impl ParseReport {
    pub fn has_skipped(&self) -> bool {
        !self.skipped_lines.is_empty()
    }
}

/// A parsed schema together with its parse report
#[derive(Debug, Clone)]
pub struct ParsedSchema {
    pub schema: Schema,
    pub report: ParseReport,
}

/// Splits one trimmed, non-blank line into its table name and column.
///
/// The error string describes why the line is malformed.
pub fn parse_line(line: &str) -> Result<(String, ColumnDef), String> {
    let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if parts.len() != PART_COUNT {
        return Err(format!(
            "expected {} '{}'-separated fields, found {}",
            PART_COUNT, FIELD_DELIMITER, parts.len()
        ));
    }

    let (table, column) = (parts[0], parts[1]);
    if table.is_empty() {
        return Err("table name is empty".to_string());
    }
    if column.is_empty() {
        return Err("column name is empty".to_string());
    }

    Ok((
        table.to_string(),
        ColumnDef::new(column, parts[2], parts[3], parts[4]),
    ))
}

/// Reader for `.sch` files
#[derive(Debug, Clone, Default)]
pub struct SchParser {
    mode: ParseMode,
}

impl SchParser {
    /// Creates a lenient parser
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: ParseMode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::with_mode(ParseMode::Strict)
    }

    /// Parses schema text
    pub fn parse_str(&self, input: &str) -> SchResult<ParsedSchema> {
        let mut schema = Schema::new();
        let mut report = ParseReport::default();

        for (index, raw) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            report.lines_read += 1;

            let (table, column) = match parse_line(line) {
                Ok(parsed) => parsed,
                Err(reason) => match self.mode {
                    ParseMode::Strict => {
                        return Err(SchError::MalformedLine {
                            line: line_no,
                            reason,
                        });
                    }
                    ParseMode::Lenient => {
                        tracing::warn!(line = line_no, %reason, "skipping malformed schema line");
                        report.skipped_lines.push(line_no);
                        continue;
                    }
                },
            };

            if schema.column(&table, &column.name).is_some() {
                return Err(SchError::DuplicateColumn {
                    table,
                    column: column.name,
                    line: line_no,
                });
            }

            let clash = schema
                .table(&table)
                .and_then(|def| def.column_at_position_of(&column))
                .map(|existing| existing.name.clone());
            if let Some(existing) = clash {
                match self.mode {
                    ParseMode::Strict => {
                        return Err(SchError::DuplicatePosition {
                            table,
                            column: column.name,
                            existing,
                            position: column.position,
                            line: line_no,
                        });
                    }
                    ParseMode::Lenient => {
                        tracing::warn!(
                            line = line_no,
                            table = %table,
                            column = %column.name,
                            position = %column.position,
                            existing = %existing,
                            "skipping column that reuses a position"
                        );
                        report.skipped_lines.push(line_no);
                        continue;
                    }
                }
            }

            schema.add_column(&table, column);
            report.columns += 1;
        }

        tracing::debug!(
            tables = schema.table_count(),
            columns = report.columns,
            skipped = report.skipped_lines.len(),
            "schema text parsed"
        );
        Ok(ParsedSchema { schema, report })
    }

    /// Reads and parses a schema file.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn parse_file(&self, path: impl AsRef<Path>) -> SchResult<ParsedSchema> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| SchError::io(path, e))?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("schema file is not valid UTF-8, replacing invalid bytes");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        let parsed = self.parse_str(&text)?;
        tracing::info!(
            tables = parsed.schema.table_count(),
            columns = parsed.report.columns,
            "schema file parsed"
        );
        Ok(parsed)
    }
}
