use super::Tabular;
use crate::error::{CsvError, Result};

// ---------------------------------------------------------------------------
// Matrix – already-tokenized rows held in memory
// ---------------------------------------------------------------------------

/// In-memory rows of cells with the same access surface as a table.
///
/// Row storage may reallocate when rows are pushed past [`capacity`](Self::capacity);
/// hold indices, not references, across insertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vec<String>>,
    header_count: usize,
}

impl Matrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty matrix with room for `rows` rows.
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            rows: Vec::with_capacity(rows),
            header_count: 0,
        }
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            header_count: 0,
        }
    }

    /// `header_count` must not exceed `rows.len()`.
    pub(crate) fn from_parts(rows: Vec<Vec<String>>, header_count: usize) -> Self {
        debug_assert!(header_count <= rows.len());
        Self { rows, header_count }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Flag the first `count` rows as headers.
    pub fn set_header_count(&mut self, count: usize) -> Result<()> {
        if count > self.rows.len() {
            return Err(CsvError::out_of_range("header", count, self.rows.len()));
        }
        self.header_count = count;
        Ok(())
    }

    /// Reserved row slots; independent of [`row_count`](Tabular::row_count).
    pub fn capacity(&self) -> usize {
        self.rows.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.rows.reserve(additional);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

impl FromIterator<Vec<String>> for Matrix {
    fn from_iter<I: IntoIterator<Item = Vec<String>>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

impl Tabular for Matrix {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn header_count(&self) -> usize {
        self.header_count
    }

    fn cells(&self, row: usize) -> Result<&[String]> {
        self.rows
            .get(row)
            .map(Vec::as_slice)
            .ok_or_else(|| CsvError::out_of_range("row", row, self.rows.len()))
    }
}
