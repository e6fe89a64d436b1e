use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use slightcsv::{Table, TableOptions, Tabular};

/// Usage: `slightcsv <file.csv> [options.json]`
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args_os().skip(1);
    let Some(csv_path) = args.next().map(PathBuf::from) else {
        bail!("usage: slightcsv <file.csv> [options.json]");
    };
    let options = match args.next().map(PathBuf::from) {
        Some(path) => TableOptions::from_json_file(&path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => TableOptions::default().with_header_detection(),
    };

    let table = Table::from_path(&csv_path, options)
        .with_context(|| format!("loading {}", csv_path.display()))?;

    println!("File: {}", csv_path.display());
    println!("File contains {} columns.", table.column_count());
    println!("File contains {} rows.", table.row_count());
    println!("Header row count: {}.", table.header_count());
    for index in 0..table.header_count() {
        println!("  header {index}: {:?}", table.row(index)?);
    }
    if table.is_ragged() {
        println!("Rows have differing cell counts.");
    }
    Ok(())
}
