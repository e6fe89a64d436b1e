//! Simple, lightweight in-memory CSV reader.
//!
//! A [`Table`] loads delimited text from a file or string and splits each
//! line into cells with a configurable separator and escape character. A
//! [`Matrix`] holds already-tokenized rows. Both expose the same 0-based,
//! range-checked access through [`Tabular`]:
//!
//! ```
//! use slightcsv::{Table, TableOptions, Tabular};
//!
//! let table = Table::parse("a,b,c\n1,2,3\n4,5,6", TableOptions::default().with_header_count(1))?;
//! assert_eq!(table.cell(1, 2)?, "3");
//! assert_eq!(table.column_range::<i32>(1, 1, 2)?, vec![2, 5]);
//! # Ok::<(), slightcsv::CsvError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;

pub use config::{HeaderMode, TableOptions};
pub use data::convert::FromCell;
pub use data::matrix::Matrix;
pub use data::row::{CellTransform, Row};
pub use data::table::Table;
pub use data::Tabular;
pub use error::{CsvError, Result};
