//! Embedded Iris reference dataset
//!
//! 150 samples of three iris species with four float measurements each and an
//! integer class label. Samples 101 and 142 are identical, so the dataset
//! carries one natural duplicate.

use crate::csv_table::CsvOptions;
use crate::Result;
use tabdedup_core::Table;

const IRIS_CSV: &str = include_str!("../data/iris.csv");

/// Name of the class label column
pub const TARGET_COLUMN: &str = "target";

/// Species names indexed by the `target` value
pub const TARGET_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// Load the Iris dataset
///
/// With `with_target` unset only the four measurement columns are returned.
pub fn load_iris(with_target: bool) -> Result<Table> {
    let table = CsvOptions::default().read_table(IRIS_CSV.as_bytes())?;
    if with_target {
        return Ok(table);
    }

    let features = table.column_count() - 1;
    let columns = table.columns()[..features].to_vec();
    let rows = table
        .rows()
        .iter()
        .map(|row| row.values()[..features].iter().cloned().collect())
        .collect();
    Ok(Table::from_rows(columns, rows)?)
}
