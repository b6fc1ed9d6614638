//! CSV rendering of detail rows.
//!
//! The HTTP `format=csv` body and `credits export` both go through
//! `write_rows_csv`, so the two can never disagree on columns or quoting.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::CreditRecord;
use crate::error::AppError;
use crate::query::SELECT_COLUMNS;

/// Write `rows` as CSV with the fixed six-column header.
///
/// `program_name` and `taxpayer_type` are always quoted (embedded quotes
/// doubled), even when they look numeric; amounts are written as plain
/// numbers.
pub fn write_rows_csv<W: Write>(mut writer: W, rows: &[CreditRecord]) -> Result<(), AppError> {
    // Header
    writeln!(writer, "{}", SELECT_COLUMNS.join(","))?;

    // Text columns arrive pre-quoted, so the writer must emit fields verbatim.
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for r in rows {
        wtr.write_record([
            r.tax_year.to_string(),
            quote_text(&r.program_name),
            r.allowed_amount.to_string(),
            r.utilized_amount.to_string(),
            r.claimed_amount.to_string(),
            quote_text(&r.taxpayer_type),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn quote_text(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn rows_to_csv(rows: &[CreditRecord]) -> Result<String, AppError> {
    let mut buf = Vec::new();
    write_rows_csv(&mut buf, rows)?;
    String::from_utf8(buf).map_err(|e| AppError::Server(format!("CSV output was not UTF-8: {e}")))
}

/// Write rows to a CSV file.
pub fn write_rows_csv_file(path: &Path, rows: &[CreditRecord]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::Config(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    write_rows_csv(file, rows)
}
