//! Column metadata read from a real SQLite database

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use schdiff_core::{ColumnDef, Schema};

use crate::{ColumnSource, StoreError, StoreResult};

/// Read-only view of an SQLite database's own tables.
///
/// Columns are described the way a `.sch` file would: the declared type
/// without its size suffix, the size argument, and a 1-based position.
pub struct LiveDatabase {
    conn: Connection,
    path: PathBuf,
}

impl LiveDatabase {
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("live database opened");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Wraps an already open connection
    pub fn from_connection(conn: Connection, path: impl Into<PathBuf>) -> Self {
        Self {
            conn,
            path: path.into(),
        }
    }

    /// User tables, sorted by name
    pub fn table_names(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Columns of one table in ordinal order
    pub fn columns(&self, table: &str) -> StoreResult<Vec<ColumnDef>> {
        tracing::trace!(table = %table, "fetching column information");
        let mut columns = Vec::new();
        self.conn.pragma(None, "table_info", table, |row| {
            let cid: i64 = row.get(0)?;
            let name: String = row.get(1)?;
            let declared: Option<String> = row.get(2)?;
            let (type_id, size) = split_declared_type(declared.as_deref().unwrap_or(""));
            columns.push(ColumnDef::new(name, type_id, size, (cid + 1).to_string()));
            Ok(())
        })?;
        Ok(columns)
    }
}

impl ColumnSource for LiveDatabase {
    fn describe(&self) -> String {
        format!("live database '{}'", self.path.display())
    }

    fn load_schema(&self) -> StoreResult<Schema> {
        let mut schema = Schema::new();
        for table in self.table_names()? {
            for column in self.columns(&table)? {
                schema.add_column(&table, column);
            }
        }
        tracing::debug!(
            tables = schema.table_count(),
            columns = schema.column_count(),
            "live schema introspected"
        );
        Ok(schema)
    }
}

/// Splits a declared SQL type such as `VARCHAR(20)` into `("VARCHAR", "20")`.
///
/// Types without an argument list get an empty size. Whitespace inside the
/// argument list is dropped, so `DECIMAL(10, 2)` gives `"10,2"`.
pub fn split_declared_type(declared: &str) -> (String, String) {
    let declared = declared.trim();
    match declared.find('(') {
        Some(open) if declared.ends_with(')') => {
            let base = declared[..open].trim().to_string();
            let args: String = declared[open + 1..declared.len() - 1]
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            (base, args)
        }
        _ => (declared.to_string(), String::new()),
    }
}
