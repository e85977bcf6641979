//! Format detection and whole-table load/save
//!
//! Picks a reader or writer from the file extension so callers can pass any
//! supported path.

use crate::csv_table::CsvOptions;
use crate::jsonl::{JsonlReader, JsonlWriter};
use crate::{Error, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tabdedup_core::Table;
use tracing::info;

/// Supported on-disk table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// JSON Lines, optionally gzip-compressed
    Jsonl,
    Csv,
}

impl TableFormat {
    /// Detect the format from a path's extension
    ///
    /// Supported extensions:
    /// - `.jsonl`, `.json` - JSON Lines format
    /// - `.gz` - Gzip-compressed JSON Lines
    /// - `.csv` - comma-separated values with a header line
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat("No file extension found".to_string()))?;

        match extension {
            "jsonl" | "json" | "gz" => Ok(TableFormat::Jsonl),
            "csv" => Ok(TableFormat::Csv),
            _ => Err(Error::UnsupportedFormat(format!(
                "Unsupported file extension: {}",
                extension
            ))),
        }
    }
}

/// Load a whole table from `path`
pub fn open_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    info!("Opening table: {:?} (format: {:?})", path, format);

    match format {
        TableFormat::Jsonl => JsonlReader::open(path)?.into_table(),
        TableFormat::Csv => CsvOptions::default().read_table(File::open(path)?),
    }
}

/// Write `table` to `path`, replacing any existing file
pub fn write_table<P: AsRef<Path>>(path: P, table: &Table) -> Result<()> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    info!(
        "Writing {} rows to {:?} (format: {:?})",
        table.row_count(),
        path,
        format
    );

    match format {
        TableFormat::Jsonl => {
            let mut writer = JsonlWriter::create(path)?;
            writer.write_table(table)?;
            writer.finish()?;
        }
        TableFormat::Csv => {
            let file = BufWriter::new(File::create(path)?);
            CsvOptions::default().write_table(table, file)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tabdedup_core::{Row, Value};

    fn sample() -> Table {
        let rows = vec![
            Row::new(vec![Value::Float(5.1), Value::Int(0)]),
            Row::new(vec![Value::Float(6.0), Value::Int(1)]),
        ];
        Table::from_rows(vec!["x".into(), "target".into()], rows).unwrap()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(TableFormat::from_path(Path::new("a.jsonl")).unwrap(), TableFormat::Jsonl);
        assert_eq!(TableFormat::from_path(Path::new("a.jsonl.gz")).unwrap(), TableFormat::Jsonl);
        assert_eq!(TableFormat::from_path(Path::new("a.csv")).unwrap(), TableFormat::Csv);
        assert!(matches!(
            TableFormat::from_path(Path::new("a.txt")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            TableFormat::from_path(Path::new("noext")),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_open_jsonl_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, r#"{{"text": "hello"}}"#).unwrap();
            writeln!(file, r#"{{"text": "world"}}"#).unwrap();
        }

        let table = open_table(&path).unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_save_and_load_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample();

        for name in ["out.jsonl", "out.jsonl.gz", "out.csv"] {
            let path = dir.path().join(name);
            write_table(&path, &table).unwrap();
            let loaded = open_table(&path).unwrap();
            assert_eq!(loaded, table, "format {}", name);
        }
    }

    #[test]
    fn test_missing_file() {
        let result = open_table("/definitely/not/here.csv");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
