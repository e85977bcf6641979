//! JSON Lines (JSONL) tables
//!
//! Each line holds one JSON object; keys are columns. Gzip-compressed files
//! are detected by their `.gz` extension on both read and write.

use crate::{Error, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{Map, Number, Value as Json};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tabdedup_core::{Row, Table, Value};
use tracing::{debug, warn};

const BUFFER_SIZE: usize = 64 * 1024;

/// Line-by-line JSONL reader yielding one JSON object per record
pub struct JsonlReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
}

impl JsonlReader<Box<dyn Read>> {
    /// Open a JSONL file, auto-detecting gzip compression
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let reader: Box<dyn Read> = if is_gzip(path) {
            debug!("Opening gzip-compressed JSONL file: {:?}", path);
            Box::new(GzDecoder::new(file))
        } else {
            debug!("Opening plain JSONL file: {:?}", path);
            Box::new(file)
        };
        Ok(Self::new(reader))
    }
}

impl<R: Read> JsonlReader<R> {
    /// Create a new JSONL reader from any Read source
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(BUFFER_SIZE, reader),
            line_number: 0,
        }
    }

    /// Get the number of lines processed
    pub fn lines_processed(&self) -> usize {
        self.line_number
    }

    /// Read every remaining record into a table
    ///
    /// The first record's key order becomes the column order. Every later
    /// record must carry exactly the same keys.
    pub fn into_table(mut self) -> Result<Table> {
        let first = match self.next() {
            Some(record) => record?,
            None => return Ok(Table::new(Vec::new())),
        };

        let columns: Vec<String> = first.keys().cloned().collect();
        let row = object_to_row(&first, &columns, self.line_number)?;
        let mut table = Table::new(columns);
        table.push_row(row)?;

        while let Some(record) = self.next() {
            let record = record?;
            let row = object_to_row(&record, table.columns(), self.line_number)?;
            table.push_row(row)?;
        }

        debug!(
            "Read {} rows x {} columns from {} lines",
            table.row_count(),
            table.column_count(),
            self.lines_processed()
        );
        Ok(table)
    }
}

impl<R: Read> Iterator for JsonlReader<R> {
    type Item = Result<Map<String, Json>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_number += 1;

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match serde_json::from_str::<Json>(trimmed) {
                        Ok(Json::Object(map)) => return Some(Ok(map)),
                        Ok(other) => {
                            warn!(
                                "Skipping line {}: expected a JSON object, found {}",
                                self.line_number, other
                            );
                            continue;
                        }
                        Err(e) => {
                            warn!(
                                "Failed to parse JSON at line {}: {} - Error: {}",
                                self.line_number, trimmed, e
                            );
                            continue;
                        }
                    }
                }
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
    }
}

/// Writes table rows as JSON objects, one per line
pub struct JsonlWriter<W: Write> {
    writer: W,
    rows_written: usize,
}

/// File behind a [`JsonlWriter`] opened with [`JsonlWriter::create`]
pub enum JsonlSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl JsonlSink {
    /// Write any buffered bytes and, for gzip, the final block and trailer
    fn complete(&mut self) -> std::io::Result<()> {
        match self {
            JsonlSink::Plain(w) => w.flush(),
            JsonlSink::Gzip(w) => {
                w.try_finish()?;
                w.get_mut().flush()
            }
        }
    }
}

impl Write for JsonlSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            JsonlSink::Plain(w) => w.write(buf),
            JsonlSink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            JsonlSink::Plain(w) => w.flush(),
            JsonlSink::Gzip(w) => w.flush(),
        }
    }
}

impl JsonlWriter<JsonlSink> {
    /// Create a JSONL file, gzip-compressing when the path ends in `.gz`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = BufWriter::new(File::create(path)?);
        let sink = if is_gzip(path) {
            JsonlSink::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            JsonlSink::Plain(file)
        };
        Ok(Self::new(sink))
    }

    /// Complete the file and return the sink
    ///
    /// The file is fully written once this returns `Ok`, so write errors
    /// surface here instead of being lost on drop.
    pub fn finish(mut self) -> Result<JsonlSink> {
        self.writer.complete()?;
        Ok(self.writer)
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            rows_written: 0,
        }
    }

    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        for (_, row) in table.iter() {
            self.write_row(table.columns(), row)?;
        }
        Ok(())
    }

    pub fn write_row(&mut self, columns: &[String], row: &Row) -> Result<()> {
        let object = row_to_object(columns, row)?;
        serde_json::to_writer(&mut self.writer, &Json::Object(object))?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and return the inner writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Convert a JSON scalar to a cell value
pub fn json_to_value(json: &Json) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(Error::InvalidFile(format!("number out of range: {}", n)))
            }
        }
        Json::String(s) => Ok(Value::Text(s.clone())),
        Json::Array(_) | Json::Object(_) => Err(Error::InvalidFile(format!(
            "nested values are not supported: {}",
            json
        ))),
    }
}

/// Convert a cell value to JSON
pub fn value_to_json(value: &Value) -> Result<Json> {
    match value {
        Value::Null => Ok(Json::Null),
        Value::Bool(b) => Ok(Json::Bool(*b)),
        Value::Int(i) => Ok(Json::Number((*i).into())),
        Value::Float(f) => Number::from_f64(*f).map(Json::Number).ok_or_else(|| {
            Error::InvalidFile(format!(
                "{} value {} cannot be written as JSON",
                value.type_name(),
                f
            ))
        }),
        Value::Text(s) => Ok(Json::String(s.clone())),
    }
}

fn object_to_row(object: &Map<String, Json>, columns: &[String], line: usize) -> Result<Row> {
    if object.len() != columns.len() || columns.iter().any(|c| !object.contains_key(c)) {
        let keys: Vec<&String> = object.keys().collect();
        return Err(Error::InvalidFile(format!(
            "line {}: keys {:?} do not match columns {:?}",
            line, keys, columns
        )));
    }

    let values = columns
        .iter()
        .map(|c| json_to_value(&object[c.as_str()]))
        .collect::<Result<Vec<_>>>()?;
    Ok(Row::new(values))
}

fn row_to_object(columns: &[String], row: &Row) -> Result<Map<String, Json>> {
    let mut object = Map::with_capacity(columns.len());
    for (column, value) in columns.iter().zip(row.values()) {
        object.insert(column.clone(), value_to_json(value)?);
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_jsonl_reader_basic() {
        let data = r#"{"text": "hello", "id": 1}
{"text": "world", "id": 2}
{"text": "rust", "id": 3}"#;

        let table = JsonlReader::new(data.as_bytes()).into_table().unwrap();

        assert_eq!(table.shape(), (3, 2));
        assert_eq!(table.columns(), &["text".to_string(), "id".to_string()]);
        assert_eq!(table.rows()[1].get(0), Some(&Value::Text("world".into())));
        assert_eq!(table.rows()[2].get(1), Some(&Value::Int(3)));
    }

    #[test]
    fn test_jsonl_reader_with_empty_lines() {
        let data = r#"{"text": "hello"}

{"text": "world"}

"#;

        let table = JsonlReader::new(data.as_bytes()).into_table().unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_jsonl_reader_with_malformed_json() {
        let data = r#"{"text": "hello"}
{invalid json}
[1, 2]
{"text": "world"}"#;

        let table = JsonlReader::new(data.as_bytes()).into_table().unwrap();

        // Malformed and non-object lines are skipped
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1].get(0), Some(&Value::Text("world".into())));
    }

    #[test]
    fn test_key_order_independent_rows() {
        let data = r#"{"a": 1, "b": 2.5}
{"b": 2.5, "a": 1}"#;

        let table = JsonlReader::new(data.as_bytes()).into_table().unwrap();
        assert_eq!(table.rows()[0], table.rows()[1]);
    }

    #[test]
    fn test_mismatched_keys_rejected() {
        let data = r#"{"a": 1, "b": 2}
{"a": 1, "c": 2}"#;

        let result = JsonlReader::new(data.as_bytes()).into_table();
        assert!(matches!(result, Err(Error::InvalidFile(_))));
    }

    #[test]
    fn test_nested_values_rejected() {
        let data = r#"{"a": [1, 2]}"#;
        let result = JsonlReader::new(data.as_bytes()).into_table();
        assert!(matches!(result, Err(Error::InvalidFile(_))));
    }

    #[test]
    fn test_int_and_float_stay_distinct() {
        let data = r#"{"x": 1}
{"x": 1.0}"#;

        let table = JsonlReader::new(data.as_bytes()).into_table().unwrap();
        assert_eq!(table.rows()[0].get(0), Some(&Value::Int(1)));
        assert_eq!(table.rows()[1].get(0), Some(&Value::Float(1.0)));
    }

    #[test]
    fn test_jsonl_reader_progress_tracking() {
        let data = r#"{"text": "hello"}
{"text": "world"}"#;

        let mut reader = JsonlReader::new(data.as_bytes());

        assert_eq!(reader.lines_processed(), 0);

        let _ = reader.next();
        assert_eq!(reader.lines_processed(), 1);

        let _ = reader.next();
        assert_eq!(reader.lines_processed(), 2);
    }

    #[test]
    fn test_empty_input() {
        let table = JsonlReader::new("".as_bytes()).into_table().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_writer_output() {
        let rows = vec![Row::new(vec![Value::Float(5.1), Value::Int(0), Value::Null])];
        let table = Table::from_rows(vec!["x".into(), "y".into(), "z".into()], rows).unwrap();

        let mut writer = JsonlWriter::new(Vec::new());
        writer.write_table(&table).unwrap();
        assert_eq!(writer.rows_written(), 1);

        let bytes = writer.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\"x\":5.1,\"y\":0,\"z\":null}\n"
        );
    }

    #[test]
    fn test_writer_rejects_nan() {
        let rows = vec![Row::new(vec![Value::Float(f64::NAN)])];
        let table = Table::from_rows(vec!["x".into()], rows).unwrap();

        let mut writer = JsonlWriter::new(Vec::new());
        let err = writer.write_table(&table).unwrap_err();
        assert!(err.to_string().contains("float value NaN"), "{}", err);
    }

    #[test]
    fn test_jsonl_reader_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"{{"text": "hello"}}"#).unwrap();
        writeln!(temp_file, r#"{{"text": "world"}}"#).unwrap();
        temp_file.flush().unwrap();

        let table = JsonlReader::open(temp_file.path()).unwrap().into_table().unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_jsonl_gzip_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.jsonl.gz");

        let rows = vec![
            Row::new(vec![Value::Text("compressed".into()), Value::Float(0.5)]),
            Row::new(vec![Value::Text("data".into()), Value::Float(2.0)]),
        ];
        let table = Table::from_rows(vec!["text".into(), "score".into()], rows).unwrap();

        let mut writer = JsonlWriter::create(&path).unwrap();
        writer.write_table(&table).unwrap();
        writer.finish().unwrap();

        let loaded = JsonlReader::open(&path).unwrap().into_table().unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_gzip_file_complete_before_sink_drops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.jsonl.gz");

        let rows = vec![
            Row::new(vec![Value::Int(1), Value::Text("a".into())]),
            Row::new(vec![Value::Int(2), Value::Text("b".into())]),
        ];
        let table = Table::from_rows(vec!["id".into(), "tag".into()], rows).unwrap();

        let mut writer = JsonlWriter::create(&path).unwrap();
        writer.write_table(&table).unwrap();
        let sink = writer.finish().unwrap();
        assert!(matches!(sink, JsonlSink::Gzip(_)));

        let loaded = JsonlReader::open(&path).unwrap().into_table().unwrap();
        assert_eq!(loaded, table);
        drop(sink);
    }
}
