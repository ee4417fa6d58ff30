//! Delimited-text rendering of record sequences.
//!
//! A header line with the column names is followed by one line per record.
//! Null and NaN cells render empty; fields containing a comma, quote or
//! newline are quoted with inner quotes doubled.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to encode table row")]
    Csv(#[from] csv::Error),

    #[error("failed to flush table buffer")]
    Io(#[from] std::io::Error),

    #[error("table is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// One field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Cell::Null, Cell::Number)
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

/// Anything that can be looked up by column name.
pub trait TableRecord {
    fn cell(&self, column: &str) -> Cell;
}

impl Cell {
    /// Text of the field before quoting.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Number(v) => format_number(*v),
            Cell::Text(s) => s.clone(),
        }
    }
}

/// Formats a number the way spreadsheet and dataframe readers expect.
///
/// NaN is empty, infinities are spelled out, negative zero prints as `0`,
/// and very large or very small magnitudes switch to exponent notation.
/// Everything else is the shortest decimal that round-trips.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        return String::new();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let magnitude = v.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{v:e}");
        // Rust prints `1e21`; readers expect an explicit sign on the exponent.
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    v.to_string()
}

/// Renders `records` under `columns`. Lines are joined by `\n`; the last one
/// has no terminator.
pub fn render_table<R: TableRecord>(columns: &[&str], records: &[R]) -> Result<String, TableError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|column| record.cell(column).render()))?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(String::from_utf8(bytes)?)
}
