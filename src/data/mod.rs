//! Data layer: row tokenization, file-backed tables, in-memory matrices.
//!
//! Architecture:
//! ```text
//!   file / &str
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  read + split into lines
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   row     │  one line → cells (separator / escape / strip / replace)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐      to_matrix()      ┌──────────┐
//!   │  table    │ ───────────────────▶ │  matrix   │
//!   └──────────┘                       └──────────┘
//!        └──────────── Tabular ─────────────┘
//!             cell / row / column<T> access
//! ```

pub mod convert;
pub mod loader;
pub mod matrix;
pub mod row;
pub mod table;

use crate::error::{CsvError, Result};
use convert::FromCell;

// ---------------------------------------------------------------------------
// Tabular – shared read access over rows of cells
// ---------------------------------------------------------------------------

/// Read access shared by [`table::Table`] and [`matrix::Matrix`].
///
/// All indices are 0-based and range-checked. Ragged rows are allowed;
/// reading past the end of a short row is an `IndexOutOfRange` error, never
/// an implicit empty cell.
///
/// The ranged variants (`*_from`, `*_range`) return the unbounded result
/// restricted to the requested window and reject windows that run past the
/// end instead of truncating them.
pub trait Tabular {
    fn row_count(&self) -> usize;

    fn header_count(&self) -> usize;

    /// Cells of one row.
    fn cells(&self, row: usize) -> Result<&[String]>;

    /// Widest row's cell count.
    fn column_count(&self) -> usize {
        (0..self.row_count())
            .filter_map(|r| self.cells(r).ok().map(<[String]>::len))
            .max()
            .unwrap_or(0)
    }

    fn cell_count(&self, row: usize) -> Result<usize> {
        Ok(self.cells(row)?.len())
    }

    fn cell(&self, row: usize, column: usize) -> Result<&str> {
        let cells = self.cells(row)?;
        cells
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| CsvError::out_of_range("column", column, cells.len()))
    }

    fn cell_as<T: FromCell>(&self, row: usize, column: usize) -> Result<T> {
        let text = self.cell(row, column)?;
        convert_cell(text, row, column)
    }

    fn row(&self, row: usize) -> Result<Vec<String>> {
        Ok(self.cells(row)?.to_vec())
    }

    fn row_from(&self, row: usize, start: usize) -> Result<Vec<String>> {
        let cells = self.cells(row)?;
        check_start("cell", start, cells.len())?;
        Ok(cells[start..].to_vec())
    }

    fn row_range(&self, row: usize, start: usize, count: usize) -> Result<Vec<String>> {
        let cells = self.cells(row)?;
        let end = check_window("cell", start, count, cells.len())?;
        Ok(cells[start..end].to_vec())
    }

    fn column<T: FromCell>(&self, column: usize) -> Result<Vec<T>> {
        check_column(self, column)?;
        collect_column(self, column, 0, self.row_count())
    }

    fn column_from<T: FromCell>(&self, column: usize, start: usize) -> Result<Vec<T>> {
        check_column(self, column)?;
        check_start("row", start, self.row_count())?;
        collect_column(self, column, start, self.row_count())
    }

    fn column_range<T: FromCell>(&self, column: usize, start: usize, count: usize) -> Result<Vec<T>> {
        check_column(self, column)?;
        let end = check_window("row", start, count, self.row_count())?;
        collect_column(self, column, start, end)
    }
}

fn check_column<S: Tabular + ?Sized>(table: &S, column: usize) -> Result<()> {
    let width = table.column_count();
    if column >= width {
        return Err(CsvError::out_of_range("column", column, width));
    }
    Ok(())
}

fn collect_column<T: FromCell, S: Tabular + ?Sized>(
    table: &S,
    column: usize,
    start: usize,
    end: usize,
) -> Result<Vec<T>> {
    (start..end).map(|row| table.cell_as::<T>(row, column)).collect()
}

fn convert_cell<T: FromCell>(text: &str, row: usize, column: usize) -> Result<T> {
    T::from_cell(text).map_err(|reason| CsvError::Conversion {
        row,
        column,
        value: text.to_string(),
        target: T::TARGET,
        reason,
    })
}

/// `start` must address an existing element.
fn check_start(what: &'static str, start: usize, len: usize) -> Result<()> {
    if start >= len {
        return Err(CsvError::out_of_range(what, start, len));
    }
    Ok(())
}

/// `[start, start + count)` must lie within `len`; returns the exclusive end.
fn check_window(what: &'static str, start: usize, count: usize, len: usize) -> Result<usize> {
    check_start(what, start, len)?;
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(end),
        _ => Err(CsvError::out_of_range(what, start.saturating_add(count), len)),
    }
}
