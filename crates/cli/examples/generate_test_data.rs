use tabdedup_core::{inject_duplicates, Row, Table, Value};
use tabdedup_formats::{load_iris, write_table};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/test_table.csv".to_string());

    println!("🔧 Generating test table: {}\n", output_file);

    // Iris with its class label; rows 101 and 142 are already identical
    println!("Loading Iris reference rows...");
    let iris = load_iris(true)?;

    // Rows that differ only in type or by a single column are not duplicates
    println!("Adding near misses...");
    let mut table = Table::new(iris.columns().to_vec());
    for row in iris.rows() {
        table.push_row(row.clone())?;
    }
    table.push_row(Row::new(vec![
        Value::Float(5.1),
        Value::Float(3.5),
        Value::Float(1.4),
        Value::Float(0.2),
        Value::Int(1),
    ]))?;
    table.push_row(Row::new(vec![
        Value::Float(5.1),
        Value::Float(3.5),
        Value::Float(1.4),
        Value::Float(0.25),
        Value::Int(0),
    ]))?;

    // Exact duplicates drawn with a fixed seed
    println!("Injecting 25 exact duplicates (seed 7)...");
    let with_duplicates = inject_duplicates(&table, 25, 7, false)?;

    write_table(&output_file, &with_duplicates)?;

    println!("\n✓ Generated test table with {} rows", with_duplicates.row_count());
    println!("  - Natural duplicates:  1");
    println!("  - Injected duplicates: 25");
    println!("  - Near misses:         2");
    println!("\nRun deduplication with:");
    println!("  tabdedup dedup -i {} -o /tmp/clean.csv --keep first", output_file);
    println!("  tabdedup dedup -i {} -o /tmp/clean.csv --keep none", output_file);

    Ok(())
}
