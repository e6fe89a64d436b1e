// ---------------------------------------------------------------------------
// FromCell – text → typed value conversion used by typed column access
// ---------------------------------------------------------------------------

/// Conversion from a cell's text to a typed value.
///
/// Numeric targets ignore surrounding whitespace. Floats also accept a
/// decimal comma (`"3,5"`) when the text does not parse as-is. Failures
/// return a human-readable reason; nothing falls back to a default.
pub trait FromCell: Sized {
    /// Type name used in conversion errors.
    const TARGET: &'static str;

    fn from_cell(text: &str) -> Result<Self, String>;
}

impl FromCell for String {
    const TARGET: &'static str = "String";

    fn from_cell(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }
}

impl FromCell for bool {
    const TARGET: &'static str = "bool";

    fn from_cell(text: &str) -> Result<Self, String> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err("expected true/false or 1/0".to_string()),
        }
    }
}

impl FromCell for char {
    const TARGET: &'static str = "char";

    fn from_cell(text: &str) -> Result<Self, String> {
        text.parse::<char>().map_err(|e| e.to_string())
    }
}

macro_rules! from_cell_int {
    ($($t:ty),*) => {$(
        impl FromCell for $t {
            const TARGET: &'static str = stringify!($t);

            fn from_cell(text: &str) -> Result<Self, String> {
                text.trim().parse::<$t>().map_err(|e| e.to_string())
            }
        }
    )*};
}

macro_rules! from_cell_float {
    ($($t:ty),*) => {$(
        impl FromCell for $t {
            const TARGET: &'static str = stringify!($t);

            fn from_cell(text: &str) -> Result<Self, String> {
                let trimmed = text.trim();
                match trimmed.parse::<$t>() {
                    Ok(v) => Ok(v),
                    Err(e) if trimmed.matches(',').count() == 1 => trimmed
                        .replace(',', ".")
                        .parse::<$t>()
                        .map_err(|_| e.to_string()),
                    Err(e) => Err(e.to_string()),
                }
            }
        }
    )*};
}

from_cell_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
from_cell_float!(f32, f64);
