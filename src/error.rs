use std::path::PathBuf;

use thiserror::Error;

/// Result type for table loading and access.
pub type Result<T> = std::result::Result<T, CsvError>;

/// Everything that can go wrong while loading or reading a table.
#[derive(Error, Debug)]
pub enum CsvError {
    /// The source file is missing or could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Contradictory or unusable settings (e.g. separator equal to escape).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A row, column, cell index or range lies outside the data.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A cell could not be converted to the requested type.
    #[error("cannot convert cell ({row}, {column}) '{value}' to {target}: {reason}")]
    Conversion {
        row: usize,
        column: usize,
        value: String,
        target: &'static str,
        reason: String,
    },

    /// A row's width differs from the first row while uniform width is enforced.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Header detection found a header-looking row after the first data row.
    #[error("row {row} looks like a header but follows data rows (header count {header_count})")]
    IntermediateHeader { row: usize, header_count: usize },

    /// Table options could not be deserialized.
    #[error("invalid table options: {0}")]
    OptionsParse(#[from] serde_json::Error),
}

impl CsvError {
    pub(crate) fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        CsvError::IndexOutOfRange { what, index, len }
    }
}
