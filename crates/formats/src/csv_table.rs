//! Headered CSV tables

use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::io::{Read, Write};
use tabdedup_core::{Row, Table, Value};
use tracing::debug;

/// CSV reader/writer settings
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Delimiter character (default: comma)
    pub delimiter: u8,
    /// Whether to trim whitespace from values
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read a headered CSV document into a table
    ///
    /// Cells are typed in order: empty is `Null`, then integer, float and
    /// boolean; anything else stays text.
    pub fn read_table<R: Read>(&self, reader: R) -> Result<Table> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut table = Table::new(columns);

        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            if record.len() != table.column_count() {
                return Err(Error::InvalidFile(format!(
                    "record {} has {} fields, expected {}",
                    line + 1,
                    record.len(),
                    table.column_count()
                )));
            }
            table.push_row(parse_record(&record))?;
        }

        debug!(
            "Read {} rows x {} columns from CSV",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    /// Write `table` as CSV with a header line
    pub fn write_table<W: Write>(&self, table: &Table, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        csv_writer.write_record(table.columns())?;
        for (_, row) in table.iter() {
            csv_writer.write_record(row.values().iter().map(|v| v.to_string()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn parse_record(record: &StringRecord) -> Row {
    Row::new(record.iter().map(parse_cell).collect())
}

/// Infer the type of a single CSV cell
pub fn parse_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        return Value::Float(f);
    }
    match cell {
        "true" | "True" | "TRUE" => Value::Bool(true),
        "false" | "False" | "FALSE" => Value::Bool(false),
        _ => Value::Text(cell.to_string()),
    }
}
