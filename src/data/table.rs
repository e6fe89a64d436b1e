use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use super::loader::{read_lines, split_lines};
use super::matrix::Matrix;
use super::row::{CellTransform, Row};
use super::Tabular;
use crate::config::{HeaderMode, TableOptions};
use crate::error::{CsvError, Result};

// ---------------------------------------------------------------------------
// Table – delimited text loaded into rows
// ---------------------------------------------------------------------------

/// A delimited file (or string) split into [`Row`]s under one set of
/// [`TableOptions`]. Structure is fixed once loaded.
#[derive(Debug, Clone)]
pub struct Table {
    file_name: Option<PathBuf>,
    options: TableOptions,
    rows: Vec<Row>,
    header_count: usize,
    column_count: usize,
}

impl Table {
    /// Load and tokenize the file at `path`.
    pub fn from_path(path: impl AsRef<Path>, options: TableOptions) -> Result<Self> {
        let path = path.as_ref();
        options.validate()?;
        let lines = read_lines(path, options.escape)?;
        let table = Self::build(lines, options, Some(path.to_path_buf()))?;
        info!(
            "Loaded {}: {} rows, {} columns, {} header rows",
            path.display(),
            table.rows.len(),
            table.column_count,
            table.header_count
        );
        Ok(table)
    }

    /// Tokenize in-memory text; the resulting table has no file name.
    pub fn parse(text: &str, options: TableOptions) -> Result<Self> {
        options.validate()?;
        Self::build(split_lines(text, options.escape), options, None)
    }

    fn build(lines: Vec<String>, options: TableOptions, file_name: Option<PathBuf>) -> Result<Self> {
        let transform = Arc::new(CellTransform::from_options(&options));
        let mut rows = Vec::with_capacity(lines.len());
        let mut column_count = 0;
        let mut ragged = false;

        for (index, line) in lines.into_iter().enumerate() {
            let row = Row::with_transform(line, options.separator, options.escape, Arc::clone(&transform))?;
            let width = row.cell_count();
            if let Some(first) = rows.first().map(Row::cell_count) {
                if width != first {
                    if options.uniform_width {
                        return Err(CsvError::RaggedRow {
                            row: index,
                            expected: first,
                            found: width,
                        });
                    }
                    ragged = true;
                }
            }
            column_count = column_count.max(width);
            rows.push(row);
        }
        if ragged {
            warn!("table rows have differing cell counts (widest: {column_count})");
        }

        let header_count = match options.header {
            HeaderMode::Fixed(n) if n > rows.len() => {
                return Err(CsvError::Configuration(format!(
                    "header count {n} exceeds row count {}",
                    rows.len()
                )));
            }
            HeaderMode::Fixed(n) => n,
            HeaderMode::Detect => {
                let detected = rows.iter().take_while(|r| r.looks_like_header()).count();
                if detected == 0 && !rows.is_empty() {
                    warn!("header detection found no header rows");
                }
                if let Some(row) = rows.iter().skip(detected).position(Row::looks_like_header) {
                    return Err(CsvError::IntermediateHeader {
                        row: detected + row,
                        header_count: detected,
                    });
                }
                detected
            }
        };
        for row in rows.iter_mut().take(header_count) {
            row.set_is_header(true);
        }
        debug!("tokenized {} rows, {header_count} flagged as header", rows.len());

        Ok(Self {
            file_name,
            options,
            rows,
            header_count,
            column_count,
        })
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn separator(&self) -> char {
        self.options.separator
    }

    pub fn escape(&self) -> char {
        self.options.escape
    }

    pub fn strip_chars(&self) -> &BTreeSet<char> {
        &self.options.strip_chars
    }

    pub fn replace_chars(&self) -> &BTreeMap<char, char> {
        &self.options.replace_chars
    }

    /// Tokenized rows, headers included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn raw_row(&self, row: usize) -> Result<&Row> {
        self.rows
            .get(row)
            .ok_or_else(|| CsvError::out_of_range("row", row, self.rows.len()))
    }

    pub fn is_ragged(&self) -> bool {
        self.rows.iter().any(|r| r.cell_count() != self.column_count)
    }

    /// Copy the cells into an in-memory [`Matrix`], keeping the header count.
    pub fn to_matrix(&self) -> Matrix {
        let rows = self.rows.iter().map(|r| r.cells().to_vec()).collect();
        Matrix::from_parts(rows, self.header_count)
    }
}

impl Tabular for Table {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn header_count(&self) -> usize {
        self.header_count
    }

    fn column_count(&self) -> usize {
        self.column_count
    }

    fn cells(&self, row: usize) -> Result<&[String]> {
        Ok(self.raw_row(row)?.cells())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn init_test_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sample() -> Table {
        Table::parse("a,b,c\n1,2,3\n4,5,6", TableOptions::default().with_header_count(1)).unwrap()
    }

    #[test]
    fn three_by_three_with_one_header() {
        let table = sample();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.header_count(), 1);
        assert_eq!(table.cell(1, 2).unwrap(), "3");
        assert_eq!(table.column_range::<i32>(1, 1, 2).unwrap(), vec![2, 5]);
        assert!(table.file_name().is_none());
    }

    #[test]
    fn header_flags_follow_header_count() {
        let table = sample();
        let flags: Vec<bool> = table.rows().iter().map(Row::is_header).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn out_of_range_cells_are_errors() {
        let table = sample();
        let rows = table.row_count();
        let width = table.cell_count(0).unwrap();
        assert!(matches!(table.cell(rows, 0), Err(CsvError::IndexOutOfRange { .. })));
        assert!(matches!(table.cell(0, width), Err(CsvError::IndexOutOfRange { .. })));
    }

    #[test]
    fn row_ranges() {
        let table = sample();
        assert_eq!(table.row(2).unwrap(), vec!["4", "5", "6"]);
        assert_eq!(table.row_from(2, 1).unwrap(), vec!["5", "6"]);
        assert_eq!(table.row_range(2, 1, 1).unwrap(), vec!["5"]);
        assert!(table.row_from(2, 3).is_err());
        assert!(table.row_range(2, 1, 3).is_err());
        assert!(table.row_range(2, 0, usize::MAX).is_err());
    }

    #[test]
    fn typed_columns_skip_headers_with_start() {
        let table = sample();
        assert_eq!(table.column_from::<i64>(0, 1).unwrap(), vec![1, 4]);
        assert_eq!(table.column::<String>(2).unwrap(), vec!["c", "3", "6"]);
        assert!(table.column_from::<i64>(0, 3).is_err());
        assert!(table.column_range::<i64>(0, 2, 2).is_err());
        assert!(table.column::<i64>(3).is_err());
    }

    #[test]
    fn conversion_failure_returns_no_partial_column() {
        let table = sample();
        match table.column::<i32>(0) {
            Err(CsvError::Conversion { row, column, value, target, .. }) => {
                assert_eq!((row, column), (0, 0));
                assert_eq!(value, "a");
                assert_eq!(target, "i32");
            }
            other => panic!("expected conversion error, got {other:?}"),
        }
    }

    #[test]
    fn typed_single_cell() {
        let table = sample();
        assert_eq!(table.cell_as::<f64>(2, 1).unwrap(), 5.0);
        assert!(table.cell_as::<f64>(0, 1).is_err());
    }

    #[test]
    fn ragged_rows_are_bounds_checked_per_row() {
        let table = Table::parse("a,b,c\n1,2\n3,4,5", TableOptions::default()).unwrap();
        assert!(table.is_ragged());
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.cell_count(1).unwrap(), 2);
        assert!(matches!(
            table.column::<String>(2),
            Err(CsvError::IndexOutOfRange { what: "column", index: 2, len: 2 })
        ));
        assert_eq!(table.column_range::<String>(2, 2, 1).unwrap(), vec!["5"]);
    }

    #[test]
    fn uniform_width_rejects_ragged_rows() {
        let options = TableOptions::default().with_uniform_width(true);
        let err = Table::parse("a,b,c\n1,2\n", options).unwrap_err();
        assert!(matches!(err, CsvError::RaggedRow { row: 1, expected: 3, found: 2 }));
    }

    #[test]
    fn escapes_and_transforms_apply_to_cells() {
        let options = TableOptions::default()
            .with_separator(';')
            .with_strip_chars(['"'])
            .with_replace_chars([(',', '.')]);
        let table = Table::parse("\"name\";\"value\"\nx\\;y;\"1,5\"", options).unwrap();
        assert_eq!(table.row(0).unwrap(), vec!["name", "value"]);
        assert_eq!(table.row(1).unwrap(), vec!["x;y", "1.5"]);
        assert_eq!(table.cell_as::<f64>(1, 1).unwrap(), 1.5);
        assert_eq!(table.separator(), ';');
        assert!(table.strip_chars().contains(&'"'));
        assert_eq!(table.replace_chars().get(&','), Some(&'.'));
    }

    #[test]
    fn header_detection_counts_leading_text_rows() {
        init_test_logging();
        let options = TableOptions::default().with_header_detection();
        let table = Table::parse("station,sensor\nunit,kind\n12,34\n56,78", options).unwrap();
        assert_eq!(table.header_count(), 2);
        assert!(!table.raw_row(3).unwrap().is_header());
    }

    #[test]
    fn header_after_data_rows_is_rejected() {
        init_test_logging();
        let options = TableOptions::default().with_header_detection();
        let err = Table::parse("name,unit\n1,2\nfoo,bar\n3,4", options).unwrap_err();
        match err {
            CsvError::IntermediateHeader { row, header_count } => {
                assert_eq!(row, 2);
                assert_eq!(header_count, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fixed_header_count_ignores_text_rows_in_data() {
        let table = Table::parse("name,unit\n1,2\nfoo,bar", TableOptions::default().with_header_count(1)).unwrap();
        assert_eq!(table.header_count(), 1);
        assert_eq!(table.row(2).unwrap(), vec!["foo", "bar"]);
    }

    #[test]
    fn escaped_line_break_stays_in_cell() {
        let table = Table::parse("a\\\nb,c\n1,2", TableOptions::default()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row(0).unwrap(), vec!["a\nb", "c"]);
        assert_eq!(table.row(1).unwrap(), vec!["1", "2"]);

        let table = Table::parse("a\\\r\nb,c\r\n1,2\r\n", TableOptions::default()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row(0).unwrap(), vec!["a\r\nb", "c"]);
    }

    #[test]
    fn replacement_may_produce_the_separator() {
        let options = TableOptions::default().with_replace_chars([(';', ',')]);
        let table = Table::parse("a;b,c\n1;5,2", options).unwrap();
        assert_eq!(table.row(0).unwrap(), vec!["a,b", "c"]);
        assert_eq!(table.cell(1, 0).unwrap(), "1,5");
        assert_eq!(table.cell_as::<f64>(1, 0).unwrap(), 1.5);
    }

    #[test]
    fn header_count_larger_than_table_is_rejected() {
        let err = Table::parse("a,b", TableOptions::default().with_header_count(2)).unwrap_err();
        assert!(matches!(err, CsvError::Configuration(_)));
    }

    #[test]
    fn invalid_options_fail_before_reading() {
        let options = TableOptions::default().with_escape(',');
        let err = Table::from_path("/no/such/file.csv", options).unwrap_err();
        assert!(matches!(err, CsvError::Configuration(_)));
    }

    #[test]
    fn loads_from_file() -> anyhow::Result<()> {
        init_test_logging();
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "time;temp\r\n\r\n00:00;21,5\r\n01:00;20,9\r\n")?;

        let options = TableOptions::default().with_separator(';').with_header_count(1);
        let table = Table::from_path(tmp.path(), options)?;
        assert_eq!(table.file_name(), Some(tmp.path()));
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_from::<f64>(1, 1)?, vec![21.5, 20.9]);
        Ok(())
    }

    #[test]
    fn reads_what_the_csv_writer_produces() -> anyhow::Result<()> {
        let tmp = NamedTempFile::new()?;
        let mut writer = csv::WriterBuilder::new().delimiter(b';').from_path(tmp.path())?;
        writer.write_record(["id", "label"])?;
        writer.write_record(["1", "first"])?;
        writer.write_record(["2", "second"])?;
        writer.flush()?;
        drop(writer);

        let options = TableOptions::default().with_separator(';').with_header_count(1);
        let table = Table::from_path(tmp.path(), options)?;
        assert_eq!(table.column_from::<u32>(0, 1)?, vec![1, 2]);
        assert_eq!(table.column::<String>(1)?, vec!["label", "first", "second"]);
        Ok(())
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Table::from_path("/no/such/file.csv", TableOptions::default()).unwrap_err();
        assert!(matches!(err, CsvError::FileRead { .. }));
    }

    #[test]
    fn converts_to_matrix_with_same_contents() {
        let table = sample();
        let matrix = table.to_matrix();
        assert_eq!(matrix.row_count(), table.row_count());
        assert_eq!(matrix.header_count(), 1);
        assert_eq!(matrix.row(1).unwrap(), table.row(1).unwrap());
    }

    #[test]
    fn concurrent_readers_share_a_table() {
        let table = sample();
        std::thread::scope(|s| {
            for col in 0..3 {
                let table = &table;
                s.spawn(move || assert_eq!(table.column_from::<u32>(col, 1).unwrap().len(), 2));
            }
        });
    }
}
