//! schdiff compare - schema file diffing and report search
//!
//! This crate provides functionality for:
//! - Comparing a parsed `.sch` schema against a store or live database
//! - Reading and writing JSON difference reports
//! - Filtering previously exported reports

pub mod compare;
pub mod report;
pub mod search;

mod error;

pub use compare::*;
pub use error::*;
pub use report::*;
pub use search::*;
