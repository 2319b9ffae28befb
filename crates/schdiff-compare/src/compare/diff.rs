//! Difference record data structures
//!
//! The serialized form of `DifferenceRecord` is the report contract:
//!
//! ```json
//! {
//!   "status": "different",
//!   "table": "customer",
//!   "column": "age",
//!   "file_info": {"type": "INT", "size": "4", "position": "3"},
//!   "db_info": {"type": "INT", "size": "8", "position": "3"}
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use schdiff_core::ColumnDef;
use serde::{Deserialize, Serialize};

/// Kind of a difference record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    /// Column exists on both sides with differing attributes
    Different,
    /// Column is declared in the file but absent from the database
    MissingInDb,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Different => "different",
            DiffStatus::MissingInDb => "missing_in_db",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "different" => Ok(DiffStatus::Different),
            "missing_in_db" => Ok(DiffStatus::MissingInDb),
            other => Err(format!(
                "unknown status '{other}', expected 'different' or 'missing_in_db'"
            )),
        }
    }
}

/// A compared column attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffField {
    Type,
    Size,
    Position,
}

impl DiffField {
    pub const ALL: [DiffField; 3] = [DiffField::Type, DiffField::Size, DiffField::Position];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffField::Type => "type",
            DiffField::Size => "size",
            DiffField::Position => "position",
        }
    }
}

impl fmt::Display for DiffField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "type" => Ok(DiffField::Type),
            "size" => Ok(DiffField::Size),
            "position" => Ok(DiffField::Position),
            other => Err(format!(
                "unknown field '{other}', expected 'type', 'size' or 'position'"
            )),
        }
    }
}

/// Type, size and position of one column on one side of a comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    #[serde(rename = "type", default)]
    pub type_id: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub position: String,
}

impl ColumnSnapshot {
    pub fn new(
        type_id: impl Into<String>,
        size: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            size: size.into(),
            position: position.into(),
        }
    }

    pub fn field(&self, field: DiffField) -> &str {
        match field {
            DiffField::Type => &self.type_id,
            DiffField::Size => &self.size,
            DiffField::Position => &self.position,
        }
    }
}

impl From<&ColumnDef> for ColumnSnapshot {
    fn from(column: &ColumnDef) -> Self {
        Self::new(&column.type_id, &column.size, &column.position)
    }
}

/// One reported mismatch or omission between a file column and its
/// database counterpart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceRecord {
    pub status: DiffStatus,
    pub table: String,
    pub column: String,
    pub file_info: ColumnSnapshot,
    /// Always `None` for `missing_in_db`, serialized as `null`
    #[serde(default)]
    pub db_info: Option<ColumnSnapshot>,
}

impl DifferenceRecord {
    /// Record for a file column with no database counterpart
    pub fn missing(
        table: impl Into<String>,
        column: impl Into<String>,
        file_info: ColumnSnapshot,
    ) -> Self {
        Self {
            status: DiffStatus::MissingInDb,
            table: table.into(),
            column: column.into(),
            file_info,
            db_info: None,
        }
    }

    /// Record for a column whose attributes differ
    pub fn different(
        table: impl Into<String>,
        column: impl Into<String>,
        file_info: ColumnSnapshot,
        db_info: ColumnSnapshot,
    ) -> Self {
        Self {
            status: DiffStatus::Different,
            table: table.into(),
            column: column.into(),
            file_info,
            db_info: Some(db_info),
        }
    }

    /// Whether `field` differs between the two snapshots.
    ///
    /// Always false for `missing_in_db` records.
    pub fn differs_in(&self, field: DiffField) -> bool {
        self.db_info
            .as_ref()
            .is_some_and(|db| db.field(field) != self.file_info.field(field))
    }

    /// Fields whose values differ, in type/size/position order
    pub fn mismatched_fields(&self) -> Vec<DiffField> {
        DiffField::ALL
            .into_iter()
            .filter(|field| self.differs_in(*field))
            .collect()
    }
}

/// The ordered result of one comparison.
///
/// Serializes as the bare record array; the ignored fields are not part of
/// the report file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffReport {
    records: Vec<DifferenceRecord>,
    #[serde(skip)]
    ignored: BTreeSet<DiffField>,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty report whose comparison left `ignored` out
    pub fn with_ignored(ignored: BTreeSet<DiffField>) -> Self {
        Self {
            records: Vec::new(),
            ignored,
        }
    }

    pub fn ignored_fields(&self) -> &BTreeSet<DiffField> {
        &self.ignored
    }

    /// Mismatched fields of `record` that the comparison looked at
    pub fn compared_mismatches(&self, record: &DifferenceRecord) -> Vec<DiffField> {
        record
            .mismatched_fields()
            .into_iter()
            .filter(|field| !self.ignored.contains(field))
            .collect()
    }

    pub fn push(&mut self, record: DifferenceRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[DifferenceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DifferenceRecord> {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn count(&self, status: DiffStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DifferenceRecord> {
        self.records.iter()
    }
}

impl From<Vec<DifferenceRecord>> for DiffReport {
    fn from(records: Vec<DifferenceRecord>) -> Self {
        Self {
            records,
            ignored: BTreeSet::new(),
        }
    }
}

impl<'a> IntoIterator for &'a DiffReport {
    type Item = &'a DifferenceRecord;
    type IntoIter = std::slice::Iter<'a, DifferenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
