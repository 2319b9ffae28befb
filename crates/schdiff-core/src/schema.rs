//! Table and column definitions

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single column as declared in a schema file or stored row.
///
/// Attributes are kept verbatim: `"04"` and `"4"` are different sizes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnDef {
    #[serde(rename = "column")]
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: String,
    pub size: String,
    pub position: String,
}

impl ColumnDef {
    pub fn new(
        name: impl Into<String>,
        type_id: impl Into<String>,
        size: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            size: size.into(),
            position: position.into(),
        }
    }

    /// Position parsed as a number, when it is one
    pub fn ordinal(&self) -> Option<u32> {
        self.position.trim().parse().ok()
    }

    /// Numeric positions compare by value (`"01"` equals `"1"`), anything
    /// else compares verbatim.
    pub fn shares_position(&self, other: &ColumnDef) -> bool {
        match (self.ordinal(), other.ordinal()) {
            (Some(a), Some(b)) => a == b,
            _ => self.position == other.position,
        }
    }
}

/// A table and its columns in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Looks up a column by exact name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// First column declared at the same position as `column`
    pub fn column_at_position_of(&self, column: &ColumnDef) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.shares_position(column))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// An ordered set of tables keyed by name.
///
/// Tables iterate in order of first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    tables: IndexMap<String, TableDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column to the named table, creating the table on first use.
    ///
    /// Returns `false` and leaves the schema unchanged when the table
    /// already has a column with the same name.
    pub fn add_column(&mut self, table: &str, column: ColumnDef) -> bool {
        let entry = self
            .tables
            .entry(table.to_string())
            .or_insert_with(|| TableDef::new(table));
        if entry.column(&column.name).is_some() {
            return false;
        }
        entry.columns.push(column);
        true
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    pub fn column(&self, table: &str, column: &str) -> Option<&ColumnDef> {
        self.tables.get(table).and_then(|t| t.column(column))
    }

    /// Tables in insertion order
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }

    /// Table names sorted alphabetically
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every (table name, column) pair in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ColumnDef)> {
        self.tables
            .values()
            .flat_map(|t| t.columns.iter().map(move |c| (t.name.as_str(), c)))
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn column_count(&self) -> usize {
        self.tables.values().map(TableDef::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Serializes as `{ "<table>": [ {column, type, size, position}, ... ] }`
impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for table in self.tables.values() {
            map.serialize_entry(&table.name, &table.columns)?;
        }
        map.end()
    }
}

impl<T: AsRef<str>> FromIterator<(T, ColumnDef)> for Schema {
    /// Builds a schema from rows, keeping the first of any repeated column
    fn from_iter<I: IntoIterator<Item = (T, ColumnDef)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (table, column) in iter {
            schema.add_column(table.as_ref(), column);
        }
        schema
    }
}
