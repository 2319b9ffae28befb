//! Schema comparator implementation
//!
//! The file is authoritative: every file column is looked up in the target,
//! columns that only exist in the target are never reported.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use schdiff_core::{ColumnDef, Schema};
use schdiff_storage::ColumnSource;

use super::diff::{ColumnSnapshot, DiffField, DiffReport, DifferenceRecord};
use crate::CompareResult;

/// Configuration for schema comparison
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Whether table and column names must match case exactly
    pub case_sensitive: bool,
    /// Attributes that are not compared
    pub ignored_fields: BTreeSet<DiffField>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            ignored_fields: BTreeSet::new(),
        }
    }
}

impl CompareConfig {
    /// Creates a config comparing every attribute with exact names
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches table and column names regardless of case
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Stops comparing the given attribute
    pub fn ignore_field(mut self, field: DiffField) -> Self {
        self.ignored_fields.insert(field);
        self
    }

    /// Attributes that are compared, in type/size/position order
    pub fn compared_fields(&self) -> impl Iterator<Item = DiffField> + '_ {
        DiffField::ALL
            .into_iter()
            .filter(|f| !self.ignored_fields.contains(f))
    }
}

/// Compares a file schema against a target schema
#[derive(Debug, Default)]
pub struct SchemaComparator {
    config: CompareConfig,
}

impl SchemaComparator {
    /// Creates a new comparator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    fn normalize_name(&self, name: &str) -> String {
        if self.config.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    /// Compares every column of `file` with its counterpart in `target`.
    ///
    /// Records come out in file order, at most one per file column. When
    /// target names collide after normalization the first one is used.
    pub fn compare(&self, file: &Schema, target: &Schema) -> DiffReport {
        let mut target_columns: HashMap<(String, String), &ColumnDef> = HashMap::new();
        for (table, column) in target.entries() {
            let key = (self.normalize_name(table), self.normalize_name(&column.name));
            match target_columns.entry(key) {
                Entry::Occupied(kept) => tracing::warn!(
                    table,
                    column = %column.name,
                    kept = %kept.get().name,
                    "database column name collides with another after normalization, ignoring it"
                ),
                Entry::Vacant(slot) => {
                    slot.insert(column);
                }
            }
        }

        let mut report = DiffReport::with_ignored(self.config.ignored_fields.clone());
        for (table, column) in file.entries() {
            let key = (self.normalize_name(table), self.normalize_name(&column.name));
            match target_columns.get(&key) {
                None => {
                    tracing::debug!(table, column = %column.name, "column missing in database");
                    report.push(DifferenceRecord::missing(
                        table,
                        &column.name,
                        ColumnSnapshot::from(column),
                    ));
                }
                Some(db_column) => {
                    if let Some(record) = self.compare_column(table, column, db_column) {
                        tracing::debug!(table, column = %column.name, "column differs");
                        report.push(record);
                    }
                }
            }
        }
        report
    }

    /// Loads `source` and compares `file` against it
    #[tracing::instrument(skip_all, fields(source = %source.describe()))]
    pub fn compare_with(
        &self,
        file: &Schema,
        source: &dyn ColumnSource,
    ) -> CompareResult<DiffReport> {
        let target = source.load_schema()?;
        let report = self.compare(file, &target);
        tracing::info!(
            compared = file.column_count(),
            differences = report.len(),
            "comparison finished"
        );
        Ok(report)
    }

    fn compare_column(
        &self,
        table: &str,
        file_column: &ColumnDef,
        db_column: &ColumnDef,
    ) -> Option<DifferenceRecord> {
        let file_info = ColumnSnapshot::from(file_column);
        let db_info = ColumnSnapshot::from(db_column);

        let differs = self
            .config
            .compared_fields()
            .any(|field| file_info.field(field) != db_info.field(field));

        differs.then(|| DifferenceRecord::different(table, &file_column.name, file_info, db_info))
    }
}
