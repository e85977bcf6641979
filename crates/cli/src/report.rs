//! Human-readable and JSON reports for CLI runs

use serde_json::{json, Value};
use std::path::Path;
use tabdedup_core::DeduplicationResult;

/// Print a formatted summary of a deduplication pass
pub fn print_summary_report(input: &Path, output: Option<&Path>, result: &DeduplicationResult) {
    println!("\n{}", "═".repeat(60));
    println!("Table Deduplication Complete");
    println!("{}", "═".repeat(60));
    println!("Input:              {}", input.display());

    if let Some(output_path) = output {
        println!("Output:             {}", output_path.display());
    } else {
        println!("Output:             (dry run - no output written)");
    }

    println!("Keep policy:        {}", result.keep);
    println!("Total rows:         {}", format_with_commas(result.original_row_count));

    if result.duplicates_found > 0 {
        println!(
            "Duplicates removed: {} ({:.1}%)",
            format_with_commas(result.duplicates_found),
            result.dedup_rate()
        );
    }

    println!(
        "Final table:        {} ({:.1}%)",
        format_with_commas(result.cleaned_row_count),
        percent(result.cleaned_row_count, result.original_row_count)
    );

    println!("{}", "═".repeat(60));
}

/// JSON form of a deduplication pass
pub fn dedup_json(input: &Path, output: Option<&Path>, result: &DeduplicationResult) -> Value {
    json!({
        "input": input.to_string_lossy(),
        "output": output.map(|p| p.to_string_lossy().to_string()),
        "keep": result.keep.as_str(),
        "original_rows": result.original_row_count,
        "duplicates_found": result.duplicates_found,
        "cleaned_rows": result.cleaned_row_count,
        "deduplication_rate": result.dedup_rate(),
    })
}

/// Format a table shape the way the demo prints it
pub fn format_shape(shape: (usize, usize)) -> String {
    format!("({}, {})", shape.0, shape.1)
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Format number with thousand separators
pub fn format_with_commas(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabdedup_core::{remove_duplicates, KeepPolicy, Row, Table};

    #[test]
    fn test_format_with_commas() {
        assert_eq!(format_with_commas(1234), "1,234");
        assert_eq!(format_with_commas(1234567), "1,234,567");
        assert_eq!(format_with_commas(123456), "123,456");
        assert_eq!(format_with_commas(42), "42");
        assert_eq!(format_with_commas(0), "0");
    }

    #[test]
    fn test_format_shape() {
        assert_eq!(format_shape((190, 4)), "(190, 4)");
    }

    #[test]
    fn test_dedup_json() {
        let rows = vec![Row::from_iter([1i64]), Row::from_iter([1i64])];
        let table = Table::from_rows(vec!["a".into()], rows).unwrap();
        let result = remove_duplicates(&table, KeepPolicy::Last, false).unwrap();

        let report = dedup_json(Path::new("in.csv"), None, &result);
        assert_eq!(report["keep"], "last");
        assert_eq!(report["duplicates_found"], 1);
        assert_eq!(report["cleaned_rows"], 1);
        assert!(report["output"].is_null());
        assert_eq!(report["deduplication_rate"], 50.0);
    }
}
