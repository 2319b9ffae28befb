//! JSON report files
//!
//! Reports are pretty-printed with two-space indentation and keep non-ASCII
//! text as-is.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::{CompareError, CompareResult, DifferenceRecord};

/// Default file name for comparer output and searcher input
pub const DEFAULT_REPORT_PATH: &str = "schema_differences.json";

/// Writes `value` as pretty JSON to `path`, replacing any existing file
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> CompareResult<()> {
    let path = path.as_ref();
    let io_err = |source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| CompareError::Report {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)?;
    tracing::debug!(path = %path.display(), "json written");
    Ok(())
}

/// Writes difference records as a JSON array
pub fn write_report(path: impl AsRef<Path>, records: &[DifferenceRecord]) -> CompareResult<()> {
    write_json(path, records)
}

/// Reads a JSON array of difference records
pub fn read_report(path: impl AsRef<Path>) -> CompareResult<Vec<DifferenceRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CompareError::ReportNotFound(path.to_path_buf())
        } else {
            CompareError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let records: Vec<DifferenceRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| CompareError::Report {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), records = records.len(), "report read");
    Ok(records)
}
