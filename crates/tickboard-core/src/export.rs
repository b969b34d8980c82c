//! CSV export of the cleaned price table.
//!
//! Layout: a `Date` column followed by one column per symbol, one row per
//! session. Values use Rust's shortest round-trip float formatting, so
//! [`parse_csv`] reproduces the exported table exactly.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::{PriceColumn, PriceTable, Symbol, TradingDate};

pub const EXPORT_FILE_NAME: &str = "selected_stocks_data.csv";
pub const EXPORT_MIME: &str = "text/csv";
const DATE_HEADER: &str = "Date";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(String),
    #[error("failed to write {path}: {message}")]
    Io { path: String, message: String },
    #[error("csv header must start with a '{DATE_HEADER}' column")]
    MissingDateColumn,
    #[error("invalid {column} value '{value}' on line {line}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },
    #[error("exported rows do not form a valid table: {0}")]
    InvalidTable(String),
}

impl From<csv::Error> for ExportError {
    fn from(error: csv::Error) -> Self {
        Self::Csv(error.to_string())
    }
}

pub fn write_csv<W: Write>(table: &PriceTable, writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(table.columns().len() + 1);
    header.push(DATE_HEADER.to_owned());
    header.extend(table.symbols().map(|symbol| symbol.to_string()));
    writer.write_record(&header)?;

    for (date, values) in table.rows() {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(date.format());
        record.extend(values.iter().map(f64::to_string));
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| ExportError::Csv(e.to_string()))?;
    Ok(())
}

/// UTF-8 CSV text for `table`.
pub fn to_csv(table: &PriceTable) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ExportError::Csv(e.to_string()))
}

pub fn write_csv_file(table: &PriceTable, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let io_error = |error: std::io::Error| ExportError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    };
    let file = std::fs::File::create(path).map_err(io_error)?;
    write_csv(table, std::io::BufWriter::new(file))
}

/// Parse text produced by [`to_csv`] back into a table.
pub fn parse_csv(text: &str) -> Result<PriceTable, ExportError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut fields = headers.iter();
    match fields.next() {
        Some(first) if first.trim().eq_ignore_ascii_case(DATE_HEADER) => {}
        _ => return Err(ExportError::MissingDateColumn),
    }
    let symbols = fields
        .map(|name| {
            Symbol::parse(name).map_err(|_| ExportError::InvalidValue {
                line: 1,
                column: String::from("header"),
                value: name.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut dates = Vec::new();
    let mut columns = symbols
        .iter()
        .map(|symbol| PriceColumn {
            symbol: symbol.clone(),
            values: Vec::new(),
        })
        .collect::<Vec<_>>();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2;

        let raw_date = record.get(0).unwrap_or_default();
        let date = TradingDate::parse(raw_date).map_err(|_| ExportError::InvalidValue {
            line,
            column: DATE_HEADER.to_owned(),
            value: raw_date.to_owned(),
        })?;
        dates.push(date);

        for (position, column) in columns.iter_mut().enumerate() {
            let raw = record.get(position + 1).unwrap_or_default();
            let value = raw.trim().parse::<f64>().map_err(|_| ExportError::InvalidValue {
                line,
                column: column.symbol.to_string(),
                value: raw.to_owned(),
            })?;
            column.values.push(value);
        }
    }

    PriceTable::new(dates, columns).map_err(|e| ExportError::InvalidTable(e.to_string()))
}
