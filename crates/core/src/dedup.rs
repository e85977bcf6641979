//! Duplicate detection over table rows

use crate::table::{Row, Table};
use crate::{Error, Result};
use ahash::{AHashMap, AHashSet};
use std::fmt;
use std::str::FromStr;

/// Which member of a duplicate equivalence class survives removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeepPolicy {
    /// Keep the first occurrence, mark later copies
    #[default]
    First,
    /// Keep the last occurrence, mark earlier copies
    Last,
    /// Mark every member of a class with more than one row
    None,
}

impl KeepPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeepPolicy::First => "first",
            KeepPolicy::Last => "last",
            KeepPolicy::None => "none",
        }
    }
}

impl fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeepPolicy {
    type Err = Error;

    /// Accepts `first`, `last`, `none` and `false` (an alias for `none`)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(KeepPolicy::First),
            "last" => Ok(KeepPolicy::Last),
            "none" | "false" => Ok(KeepPolicy::None),
            other => Err(Error::InvalidArgument(format!(
                "keep policy must be 'first', 'last' or 'none', got '{}'",
                other
            ))),
        }
    }
}

/// Tracks rows already seen during a single pass
pub struct DedupTracker<'a> {
    seen: AHashSet<&'a Row>,
}

impl<'a> DedupTracker<'a> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: AHashSet::with_capacity(capacity),
        }
    }

    /// Record `row` and report whether an equal row was seen before
    pub fn is_duplicate(&mut self, row: &'a Row) -> bool {
        !self.seen.insert(row)
    }

    /// Number of distinct rows seen
    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

impl Default for DedupTracker<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mark the rows of `table` that are duplicates under `keep`
///
/// The returned mask has one entry per row, in row order.
pub fn duplicated(table: &Table, keep: KeepPolicy) -> Vec<bool> {
    let rows = table.rows();

    match keep {
        KeepPolicy::First => {
            let mut tracker = DedupTracker::with_capacity(rows.len());
            rows.iter().map(|row| tracker.is_duplicate(row)).collect()
        }
        KeepPolicy::Last => {
            let mut tracker = DedupTracker::with_capacity(rows.len());
            let mut mask = vec![false; rows.len()];
            for (pos, row) in rows.iter().enumerate().rev() {
                mask[pos] = tracker.is_duplicate(row);
            }
            mask
        }
        KeepPolicy::None => {
            let sizes = class_sizes(rows);
            rows.iter()
                .map(|row| sizes.get(&row).copied().unwrap_or(0) > 1)
                .collect()
        }
    }
}

/// Size of the equivalence class of every distinct row
pub fn class_sizes(rows: &[Row]) -> AHashMap<&Row, usize> {
    let mut sizes: AHashMap<&Row, usize> = AHashMap::with_capacity(rows.len());
    for row in rows {
        *sizes.entry(row).or_insert(0) += 1;
    }
    sizes
}
