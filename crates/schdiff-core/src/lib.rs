//! schdiff core - schema model and `.sch` parsing
//!
//! This crate provides the types every other schdiff crate depends on:
//!
//! - `Schema`, `TableDef`, `ColumnDef` - the table/column model
//! - `SchParser` - reader for the caret-delimited `.sch` format
//! - `SchError` - errors raised while reading schema files

mod error;
mod format;
mod schema;

pub use error::*;
pub use format::*;
pub use schema::*;

#[cfg(test)]
mod tests;
