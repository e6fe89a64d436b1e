use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

const SEPARATOR: char = ';';
const ESCAPE: char = '\\';
const STATIONS: [&str; 3] = ["north", "south", "roof"];

/// Prefix every separator, escape and line break in `field` with the escape.
fn escape_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        if matches!(c, SEPARATOR | ESCAPE | '\n' | '\r') {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// One reading every ten minutes. Every seventh record has no note column,
/// some notes carry a separator or a line break that must be escaped.
fn sample_records(rows: u32) -> impl Iterator<Item = Vec<String>> {
    (0..rows).map(|i| {
        let minute = (i * 10) % (24 * 60);
        let temperature = 15.0 + f64::from((i * 37) % 120) / 10.0;
        let mut record = vec![
            format!("{:02}:{:02}", minute / 60, minute % 60),
            STATIONS[i as usize % STATIONS.len()].to_string(),
            format!("{temperature:.1}").replace('.', ","),
        ];
        let note = match i {
            i if i % 7 == 6 => None,
            i if i % 5 == 0 => Some("door open; fan on"),
            i if i % 11 == 10 => Some("reset\nok"),
            _ => Some(""),
        };
        if let Some(note) = note {
            record.push(escape_field(note));
        }
        record
    })
}

fn write_sample<W: Write>(out: W, rows: u32) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(SEPARATOR as u8)
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(out);

    writer.write_record(["time", "station", "temperature", "note"])?;
    for record in sample_records(rows) {
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing sample CSV")?;
    Ok(())
}

/// Usage: `generate_sample [output.csv] [rows]`
///
/// Writes one header row followed by `rows` sensor readings, `;`-separated
/// with `\` escapes and decimal commas. Some rows omit the trailing note.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| "sample_data.csv".to_string()));
    let rows: u32 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 144,
    };

    let file = File::create(&output_path).with_context(|| format!("creating {}", output_path.display()))?;
    write_sample(BufWriter::new(file), rows)?;

    log::info!("wrote {rows} readings to {}", output_path.display());
    println!("Wrote {rows} readings to {}", output_path.display());
    Ok(())
}
