use std::path::Path;

use log::{debug, warn};

use crate::error::{CsvError, Result};

// ---------------------------------------------------------------------------
// Line reading
// ---------------------------------------------------------------------------

/// Read a file and split it into non-empty records.
///
/// Bytes that are not valid UTF-8 are replaced with `U+FFFD` so files in
/// legacy single-byte encodings still load; a warning names the file.
pub fn read_lines(path: &Path, escape: char) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|source| CsvError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", bytes.len(), path.display());

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "{} is not valid UTF-8 (at byte {}); invalid bytes replaced",
                path.display(),
                e.utf8_error().valid_up_to()
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok(split_lines(&text, escape))
}

/// Split text into records on `\n`, `\r\n` or a lone `\r`.
///
/// An escaped character never ends a record, so `escape` followed by a line
/// break keeps both in the current record for the row tokenizer to resolve.
/// Empty records are dropped, and a leading byte-order mark is ignored.
pub fn split_lines(text: &str, escape: char) -> Vec<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
            }
            c if c == escape => {
                line.push(c);
                if let Some(next) = chars.next() {
                    line.push(next);
                    if next == '\r' && chars.peek() == Some(&'\n') {
                        line.push('\n');
                        chars.next();
                    }
                }
            }
            c => line.push(c),
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
