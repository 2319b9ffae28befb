//! Search over previously exported difference reports

mod filter;


pub use filter::*;
