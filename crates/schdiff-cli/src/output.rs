//! Terminal rendering of schemas, differences and search results

use std::io::{self, Write};

use comfy_table::Table;
use schdiff_compare::{ColumnSnapshot, DiffReport, DiffStatus, DifferenceRecord};
use schdiff_core::{Schema, TableDef};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(header);
    table
}

/// Column layout of one table
pub fn table_definition(def: &TableDef) -> Table {
    let mut table = new_table(vec!["Column", "Type", "Size", "Position"]);
    for column in &def.columns {
        table.add_row(vec![
            column.name.as_str(),
            column.type_id.as_str(),
            column.size.as_str(),
            column.position.as_str(),
        ]);
    }
    table
}

/// Prints every table sorted by name, or only `only` when given
pub fn write_schema(out: &mut dyn Write, schema: &Schema, only: Option<&str>) -> io::Result<()> {
    if let Some(name) = only {
        return match schema.table(name) {
            Some(def) => write_table(out, def),
            None => writeln!(out, "Table {name} not found"),
        };
    }

    for name in schema.table_names() {
        if let Some(def) = schema.table(name) {
            write_table(out, def)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_table(out: &mut dyn Write, def: &TableDef) -> io::Result<()> {
    writeln!(out, "Table: {}", def.name)?;
    writeln!(out, "{}", table_definition(def))
}

fn snapshot_cell(snapshot: Option<&ColumnSnapshot>) -> String {
    match snapshot {
        Some(s) => format!("type={} size={} position={}", s.type_id, s.size, s.position),
        None => "-".to_string(),
    }
}

fn status_label(report: &DiffReport, record: &DifferenceRecord) -> String {
    match record.status {
        DiffStatus::MissingInDb => "missing in database".to_string(),
        DiffStatus::Different => {
            let fields: Vec<&str> = report
                .compared_mismatches(record)
                .iter()
                .map(|f| f.as_str())
                .collect();
            format!("different ({})", fields.join(", "))
        }
    }
}

/// One-line count of a report
pub fn summary(report: &DiffReport) -> String {
    if report.is_empty() {
        return "No differences found".to_string();
    }
    format!(
        "{} difference(s): {} different, {} missing in database",
        report.len(),
        report.count(DiffStatus::Different),
        report.count(DiffStatus::MissingInDb)
    )
}

/// Prints all difference records followed by the summary
pub fn write_differences(out: &mut dyn Write, report: &DiffReport) -> io::Result<()> {
    if report.is_empty() {
        return writeln!(out, "{}", summary(report));
    }

    let mut table = new_table(vec!["Table", "Column", "Status", "File", "Database"]);
    for record in report {
        table.add_row(vec![
            record.table.clone(),
            record.column.clone(),
            status_label(report, record),
            snapshot_cell(Some(&record.file_info)),
            snapshot_cell(record.db_info.as_ref()),
        ]);
    }
    writeln!(out, "{table}")?;
    writeln!(out, "{}", summary(report))
}

/// Prints searcher results with file and database sizes
pub fn write_search_results(out: &mut dyn Write, records: &[DifferenceRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No records found");
    }

    writeln!(out, "Found {} record(s):", records.len())?;
    let mut table = new_table(vec!["Table", "Column", "Status", "Size in file", "Size in DB"]);
    for record in records {
        table.add_row(vec![
            record.table.as_str(),
            record.column.as_str(),
            record.status.as_str(),
            record.file_info.size.as_str(),
            record.db_info.as_ref().map_or("N/A", |db| db.size.as_str()),
        ]);
    }
    writeln!(out, "{table}")
}
