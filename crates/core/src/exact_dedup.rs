//! Exact duplicate removal over whole rows
//!
//! Rows are equal when every column is structurally equal. The surviving rows
//! keep their original relative order and index labels.

use crate::dedup::{duplicated, KeepPolicy};
use crate::table::Table;
use crate::{Error, Result};
use tracing::{debug, info};

/// Outcome of a deduplication pass
#[derive(Debug, Clone)]
pub struct DeduplicationResult {
    /// Rows in the input table
    pub original_row_count: usize,
    /// Rows marked as duplicates under `keep`
    pub duplicates_found: usize,
    /// Input rows that were not marked, in input order
    pub cleaned: Table,
    pub cleaned_row_count: usize,
    /// Policy the pass ran with
    pub keep: KeepPolicy,
    /// One entry per input row; `true` means the row was removed
    pub duplicate_mask: Vec<bool>,
}

impl DeduplicationResult {
    /// Duplicates as a percentage of the original rows
    pub fn dedup_rate(&self) -> f64 {
        if self.original_row_count == 0 {
            0.0
        } else {
            (self.duplicates_found as f64 / self.original_row_count as f64) * 100.0
        }
    }

    pub fn removed_row_count(&self) -> usize {
        self.original_row_count - self.cleaned_row_count
    }

    /// The rows of `source` that this pass removed, with their labels
    ///
    /// `source` must be the table the pass ran over.
    pub fn removed_rows(&self, source: &Table) -> Result<Table> {
        if source.row_count() != self.duplicate_mask.len() {
            return Err(Error::InvalidArgument(format!(
                "source table has {} rows but the deduplication pass saw {}",
                source.row_count(),
                self.duplicate_mask.len()
            )));
        }
        Ok(source.only_marked(&self.duplicate_mask))
    }
}

/// Exact whole-row deduplicator
#[derive(Debug, Clone, Default)]
pub struct ExactDeduplicator {
    keep: KeepPolicy,
    emit_report: bool,
}

impl ExactDeduplicator {
    pub fn new(keep: KeepPolicy) -> Self {
        Self {
            keep,
            emit_report: false,
        }
    }

    /// Log a statistics summary after each pass
    pub fn with_report(mut self, emit_report: bool) -> Self {
        self.emit_report = emit_report;
        self
    }

    /// Remove duplicate rows from `table`, returning a fresh table
    pub fn run(&self, table: &Table) -> Result<DeduplicationResult> {
        let original_row_count = table.row_count();
        debug!(
            "Deduplicating {} rows x {} columns (keep={})",
            original_row_count,
            table.column_count(),
            self.keep
        );

        let duplicate_mask = duplicated(table, self.keep);
        let duplicates_found = duplicate_mask.iter().filter(|&&d| d).count();

        let cleaned = table.without_marked(&duplicate_mask);
        let cleaned_row_count = cleaned.row_count();

        if cleaned_row_count > original_row_count {
            return Err(Error::InternalInvariantViolation(format!(
                "cleaned table has {} rows, more than the {} it started with",
                cleaned_row_count, original_row_count
            )));
        }
        if cleaned_row_count + duplicates_found != original_row_count {
            return Err(Error::InternalInvariantViolation(format!(
                "{} cleaned rows plus {} duplicates does not add up to {} original rows",
                cleaned_row_count, duplicates_found, original_row_count
            )));
        }

        if self.emit_report {
            info!("Duplicate removal statistics:");
            info!("  Original rows:       {}", original_row_count);
            info!("  Duplicates found:    {}", duplicates_found);
            info!("  Rows after cleaning: {}", cleaned_row_count);
        }

        Ok(DeduplicationResult {
            original_row_count,
            duplicates_found,
            cleaned,
            cleaned_row_count,
            keep: self.keep,
            duplicate_mask,
        })
    }
}

/// Remove duplicate rows from `table` under `keep`
///
/// When `emit_report` is set the row counts are logged at INFO level; the
/// returned result is the same either way.
pub fn remove_duplicates(
    table: &Table,
    keep: KeepPolicy,
    emit_report: bool,
) -> Result<DeduplicationResult> {
    ExactDeduplicator::new(keep).with_report(emit_report).run(table)
}
