use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

use crate::config::{validate_delimiters, TableOptions};
use crate::error::Result;

// ---------------------------------------------------------------------------
// CellTransform – strip/replace applied to each tokenized cell
// ---------------------------------------------------------------------------

/// Post-tokenization cell rewrite: strip first, then replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellTransform {
    strip: BTreeSet<char>,
    replace: BTreeMap<char, char>,
}

impl CellTransform {
    pub fn new(strip: BTreeSet<char>, replace: BTreeMap<char, char>) -> Self {
        Self { strip, replace }
    }

    pub fn from_options(options: &TableOptions) -> Self {
        Self::new(options.strip_chars.clone(), options.replace_chars.clone())
    }

    pub fn is_identity(&self) -> bool {
        self.strip.is_empty() && self.replace.is_empty()
    }

    pub fn apply(&self, cell: String) -> String {
        if self.is_identity() {
            return cell;
        }
        cell.chars()
            .filter(|c| !self.strip.contains(c))
            .map(|c| self.replace.get(&c).copied().unwrap_or(c))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Row – one line of input, tokenized on first access
// ---------------------------------------------------------------------------

/// A single record: raw line text plus the configuration needed to split it.
///
/// Cells are computed on first access and cached. Changing the separator or
/// escape drops the cache so the next access re-tokenizes.
#[derive(Debug, Clone)]
pub struct Row {
    input: String,
    separator: char,
    escape: char,
    transform: Arc<CellTransform>,
    cells: OnceLock<Vec<String>>,
    is_header: bool,
}

impl Row {
    /// Build a row; fails when `separator == escape`.
    pub fn new(input: impl Into<String>, separator: char, escape: char) -> Result<Self> {
        Self::with_transform(input, separator, escape, Arc::default())
    }

    pub(crate) fn with_transform(
        input: impl Into<String>,
        separator: char,
        escape: char,
        transform: Arc<CellTransform>,
    ) -> Result<Self> {
        validate_delimiters(separator, escape)?;
        Ok(Self {
            input: input.into(),
            separator,
            escape,
            transform,
            cells: OnceLock::new(),
            is_header: false,
        })
    }

    /// Split the raw input into cells.
    ///
    /// * an unescaped separator ends the current cell
    /// * `escape + separator` yields a literal separator
    /// * `escape + escape` yields one literal escape
    /// * `escape + \n` or `escape + \r` yields the literal line break
    /// * an escape before any other character, or at end of line, is kept as-is
    pub fn tokenize(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(self.input.matches(self.separator).count() + 1);
        let mut cell = String::new();
        let mut chars = self.input.chars().peekable();

        while let Some(c) = chars.next() {
            if c == self.escape {
                match chars.peek() {
                    Some(&next)
                        if next == self.separator
                            || next == self.escape
                            || next == '\n'
                            || next == '\r' =>
                    {
                        cell.push(next);
                        chars.next();
                    }
                    _ => cell.push(c),
                }
            } else if c == self.separator {
                cells.push(self.transform.apply(std::mem::take(&mut cell)));
            } else {
                cell.push(c);
            }
        }
        cells.push(self.transform.apply(cell));
        cells
    }

    /// Cached cells, tokenizing on first call.
    pub fn cells(&self) -> &[String] {
        self.cells.get_or_init(|| self.tokenize())
    }

    pub fn cell_count(&self) -> usize {
        self.cells().len()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn escape(&self) -> char {
        self.escape
    }

    pub fn set_separator(&mut self, separator: char) -> Result<()> {
        validate_delimiters(separator, self.escape)?;
        if separator != self.separator {
            self.separator = separator;
            self.cells = OnceLock::new();
        }
        Ok(())
    }

    pub fn set_escape(&mut self, escape: char) -> Result<()> {
        validate_delimiters(self.separator, escape)?;
        if escape != self.escape {
            self.escape = escape;
            self.cells = OnceLock::new();
        }
        Ok(())
    }

    pub fn is_header(&self) -> bool {
        self.is_header
    }

    pub fn set_is_header(&mut self, is_header: bool) {
        self.is_header = is_header;
    }

    /// Heuristic used by header detection: at most 10% of the characters
    /// are ASCII digits.
    pub fn looks_like_header(&self) -> bool {
        let total = self.input.chars().count();
        if total == 0 {
            return false;
        }
        let digits = self.input.chars().filter(char::is_ascii_digit).count();
        (digits as f32 / total as f32) <= 0.1
    }
}
