//! SQLite-backed store of parsed schema definitions

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction, params};
use schdiff_core::{ColumnDef, Schema};

use crate::{ColumnSource, StoreError, StoreResult};

/// Default store file name, relative to the working directory
pub const DEFAULT_STORE_PATH: &str = "schema.db";

const CREATE_SCHEMA_DEF: &str = "CREATE TABLE IF NOT EXISTS schema_def (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    type_id TEXT NOT NULL,
    size TEXT NOT NULL,
    position TEXT NOT NULL,
    UNIQUE(table_name, column_name)
)";

const INSERT_COLUMN: &str = "INSERT INTO schema_def (table_name, column_name, type_id, size, position)
     VALUES (?1, ?2, ?3, ?4, ?5)";

/// Store of table/column rows, one row per column
pub struct SchemaStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SchemaStore {
    /// Opens the store at `path`, creating the file and table if needed
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        tracing::debug!("schema store opened");
        Ok(store)
    }

    /// Opens an existing store without creating or modifying anything
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open_read_only(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Creates an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.conn.execute(CREATE_SCHEMA_DEF, [])?;
        Ok(())
    }

    fn has_schema_table(&self) -> StoreResult<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'schema_def'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Replaces the stored rows with the columns of `schema`.
    ///
    /// The table itself is kept. Returns the number of columns written.
    #[tracing::instrument(skip(self, schema), fields(columns = schema.column_count()))]
    pub fn save(&mut self, schema: &Schema) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM schema_def", [])?;
        tracing::debug!(removed, "previous rows cleared");
        let written = write_columns(&tx, schema)?;
        tx.commit()?;
        tracing::info!(written, "schema saved to store");
        Ok(written)
    }

    /// Drops and recreates `schema_def`, then writes `schema` into it
    #[tracing::instrument(skip(self, schema), fields(columns = schema.column_count()))]
    pub fn replace(&mut self, schema: &Schema) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DROP TABLE IF EXISTS schema_def", [])?;
        tx.execute(CREATE_SCHEMA_DEF, [])?;
        let written = write_columns(&tx, schema)?;
        tx.commit()?;
        tracing::info!(written, "store reset and schema saved");
        Ok(written)
    }

    /// Reads all stored rows ordered by table name, then position
    pub fn load(&self) -> StoreResult<Schema> {
        if !self.has_schema_table()? {
            tracing::warn!("store has no schema_def table, treating it as empty");
            return Ok(Schema::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT table_name, column_name, type_id, size, position
             FROM schema_def
             ORDER BY table_name, CAST(position AS INTEGER), id",
        )?;
        let rows = stmt.query_map([], |row| {
            let table: String = row.get(0)?;
            Ok((table, Self::row_to_column(row, 1)?))
        })?;

        let rows = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        tracing::debug!(rows = rows.len(), "store rows loaded");
        Ok(rows.into_iter().collect())
    }

    /// Looks up one stored column
    pub fn column(&self, table: &str, column: &str) -> StoreResult<Option<ColumnDef>> {
        let mut stmt = self.conn.prepare(
            "SELECT column_name, type_id, size, position
             FROM schema_def WHERE table_name = ?1 AND column_name = ?2",
        )?;
        let found = stmt
            .query_row(params![table, column], |row| Self::row_to_column(row, 0))
            .optional()?;
        Ok(found)
    }

    /// Number of stored column rows
    pub fn row_count(&self) -> StoreResult<usize> {
        if !self.has_schema_table()? {
            return Ok(0);
        }
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM schema_def", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_column(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<ColumnDef> {
        Ok(ColumnDef {
            name: row.get(offset)?,
            type_id: row.get(offset + 1)?,
            size: row.get(offset + 2)?,
            position: row.get(offset + 3)?,
        })
    }
}

fn write_columns(tx: &Transaction<'_>, schema: &Schema) -> StoreResult<usize> {
    let mut stmt = tx.prepare(INSERT_COLUMN)?;
    let mut written = 0;
    for (table, column) in schema.entries() {
        stmt.execute(params![
            table,
            column.name,
            column.type_id,
            column.size,
            column.position
        ])?;
        written += 1;
    }
    Ok(written)
}

impl ColumnSource for SchemaStore {
    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("schema store '{}'", path.display()),
            None => "in-memory schema store".to_string(),
        }
    }

    fn load_schema(&self) -> StoreResult<Schema> {
        self.load()
    }
}
