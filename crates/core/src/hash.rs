//! Content fingerprints for rows and tables

use crate::table::{Row, Table};

/// Compute a 64-bit hash of the given bytes
pub fn compute_hash(data: &[u8]) -> u64 {
    seahash::hash(data)
}

/// Fingerprint a single row from its canonical value encoding
pub fn row_fingerprint(row: &Row) -> u64 {
    let mut buf = Vec::with_capacity(row.len() * 9);
    encode_row(row, &mut buf);
    compute_hash(&buf)
}

/// Fingerprint a whole table: columns, index labels and every row
///
/// Two tables with the same fingerprint are, for practical purposes,
/// byte-identical. Used to show that seeded injection is reproducible.
pub fn table_fingerprint(table: &Table) -> u64 {
    let mut buf = Vec::new();
    for column in table.columns() {
        buf.extend_from_slice(&(column.len() as u64).to_le_bytes());
        buf.extend_from_slice(column.as_bytes());
    }
    for (label, row) in table.iter() {
        buf.extend_from_slice(&(label as u64).to_le_bytes());
        encode_row(row, &mut buf);
    }
    compute_hash(&buf)
}

fn encode_row(row: &Row, buf: &mut Vec<u8>) {
    for value in row.values() {
        value.encode_into(buf);
    }
}
