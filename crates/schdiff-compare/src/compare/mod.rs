//! Schema comparison module
//!
//! Compares file-declared columns against a column source and produces
//! difference records.

mod comparator;
mod diff;


pub use comparator::*;
pub use diff::*;
