use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CsvError, Result};

// ---------------------------------------------------------------------------
// HeaderMode – how header rows are identified at load time
// ---------------------------------------------------------------------------

/// How the loader decides which leading rows are headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// The first `n` rows are headers.
    Fixed(usize),
    /// Leading rows that look like text (≤ 10% digits) are headers.
    Detect,
}

impl Default for HeaderMode {
    fn default() -> Self {
        HeaderMode::Fixed(0)
    }
}

// ---------------------------------------------------------------------------
// TableOptions – parsing configuration shared by every row of a table
// ---------------------------------------------------------------------------

/// Parsing configuration for a [`Table`](crate::Table).
///
/// Cell transforms run after a line has been tokenized: every character in
/// `strip_chars` is removed from the cell text first, then each character
/// found in `replace_chars` is substituted by its mapped value. Separators and
/// escapes have already been consumed by then, so neither transform can change
/// how a line splits; both may name the separator or escape character, which
/// then only affects escaped literals inside cells.
///
/// Loadable from JSON; missing fields fall back to the defaults:
///
/// ```json
/// { "separator": ";", "escape": "\\", "strip_chars": ["\""],
///   "replace_chars": { ",": "." }, "header": { "fixed": 1 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    pub separator: char,
    pub escape: char,
    pub strip_chars: BTreeSet<char>,
    pub replace_chars: BTreeMap<char, char>,
    pub header: HeaderMode,
    /// Reject rows whose cell count differs from the first row.
    pub uniform_width: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            escape: '\\',
            strip_chars: BTreeSet::new(),
            replace_chars: BTreeMap::new(),
            header: HeaderMode::default(),
            uniform_width: false,
        }
    }
}

impl TableOptions {
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    pub fn with_strip_chars<I: IntoIterator<Item = char>>(mut self, chars: I) -> Self {
        self.strip_chars = chars.into_iter().collect();
        self
    }

    pub fn with_replace_chars<I: IntoIterator<Item = (char, char)>>(mut self, pairs: I) -> Self {
        self.replace_chars = pairs.into_iter().collect();
        self
    }

    pub fn with_header_count(mut self, count: usize) -> Self {
        self.header = HeaderMode::Fixed(count);
        self
    }

    pub fn with_header_detection(mut self) -> Self {
        self.header = HeaderMode::Detect;
        self
    }

    pub fn with_uniform_width(mut self, uniform: bool) -> Self {
        self.uniform_width = uniform;
        self
    }

    /// Parse options from a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: TableOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Read and parse options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CsvError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Reject settings under which tokenization would be ambiguous.
    pub fn validate(&self) -> Result<()> {
        validate_delimiters(self.separator, self.escape)
    }
}

/// Separator/escape pair check shared with [`Row`](crate::Row).
pub(crate) fn validate_delimiters(separator: char, escape: char) -> Result<()> {
    if separator == escape {
        return Err(CsvError::Configuration(format!(
            "separator and escape are both {separator:?}"
        )));
    }
    for (name, c) in [("separator", separator), ("escape", escape)] {
        if c == '\n' || c == '\r' {
            return Err(CsvError::Configuration(format!(
                "{name} cannot be a line terminator"
            )));
        }
    }
    Ok(())
}
