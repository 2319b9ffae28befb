//! schdiff storage - where file schemas are compared against
//!
//! - `SchemaStore` keeps parsed `.sch` definitions in a `schema_def` table
//! - `LiveDatabase` reads the real column layout of any SQLite database
//!
//! Both implement `ColumnSource`, the seam the comparer reads through.

mod error;
mod live;
mod store;

#[cfg(test)]
mod tests;

pub use error::*;
pub use live::*;
pub use store::*;

use schdiff_core::Schema;

/// Something that can produce the column layout to compare a file against
pub trait ColumnSource {
    /// Human-readable description used in logs and messages
    fn describe(&self) -> String;

    /// Loads every table and column the source knows about
    fn load_schema(&self) -> StoreResult<Schema>;
}
