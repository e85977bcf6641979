//! Seeded duplicate injection for building test fixtures
//!
//! Resamples existing rows and appends them to a copy of the table, so the
//! result contains a known number of exact duplicates. The same request always
//! produces the same table.

use crate::table::Table;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 42;

/// Parameters for one injection pass over `source`
#[derive(Debug, Clone)]
pub struct InjectionRequest<'a> {
    pub source: &'a Table,
    /// Rows to append; signed so that negative input can be rejected
    pub count: i64,
    pub seed: u64,
    /// Sample with replacement when `true`
    pub allow_repeats: bool,
}

/// A table with injected duplicates plus the source rows that were copied
#[derive(Debug, Clone)]
pub struct Injection {
    pub table: Table,
    /// Positions in the source table, in the order they were drawn and appended
    pub source_positions: Vec<usize>,
}

impl Injection {
    /// Number of rows appended to the source table
    pub fn injected_count(&self) -> usize {
        self.source_positions.len()
    }
}

impl<'a> InjectionRequest<'a> {
    /// Request `count` duplicates with the default seed, without replacement
    pub fn new(source: &'a Table, count: i64) -> Self {
        Self {
            source,
            count,
            seed: DEFAULT_SEED,
            allow_repeats: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_repeats(mut self, allow_repeats: bool) -> Self {
        self.allow_repeats = allow_repeats;
        self
    }

    /// Check the request against its source and return the count as `usize`
    pub fn validate(&self) -> Result<usize> {
        if self.count < 0 {
            return Err(Error::InvalidArgument(
                "count must be non-negative".to_string(),
            ));
        }
        let count = usize::try_from(self.count).map_err(|_| {
            Error::InvalidArgument(format!("count {} does not fit in memory", self.count))
        })?;
        let population = self.source.row_count();

        if !self.allow_repeats && count > population {
            return Err(Error::InvalidArgument(format!(
                "count exceeds population size for sampling without replacement ({} > {})",
                count, population
            )));
        }
        if self.allow_repeats && count > 0 && population == 0 {
            return Err(Error::InvalidArgument(
                "cannot sample from an empty table".to_string(),
            ));
        }

        Ok(count)
    }

    /// Run the request
    pub fn execute(&self) -> Result<Injection> {
        let count = self.validate()?;

        if count == 0 {
            return Ok(Injection {
                table: self.source.clone(),
                source_positions: Vec::new(),
            });
        }

        let source_positions = self.draw(count);
        debug!(
            "Injecting {} duplicates into {} rows (seed={}, repeats={})",
            count,
            self.source.row_count(),
            self.seed,
            self.allow_repeats
        );

        let mut rows = Vec::with_capacity(self.source.row_count() + count);
        rows.extend_from_slice(self.source.rows());
        rows.extend(source_positions.iter().map(|&p| self.source.rows()[p].clone()));
        let total = rows.len();

        let table = Table::from_parts(self.source.columns().to_vec(), rows, (0..total).collect());

        Ok(Injection {
            table,
            source_positions,
        })
    }

    fn draw(&self, count: usize) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let population = self.source.row_count();

        if self.allow_repeats {
            (0..count).map(|_| rng.gen_range(0..population)).collect()
        } else {
            index::sample(&mut rng, population, count).into_vec()
        }
    }
}

/// Append `count` randomly resampled rows of `table` to a copy of it
///
/// The result has `table.row_count() + count` rows labelled `0..n`. When
/// `count` is zero an independent copy of `table` is returned as is.
pub fn inject_duplicates(table: &Table, count: i64, seed: u64, allow_repeats: bool) -> Result<Table> {
    InjectionRequest::new(table, count)
        .with_seed(seed)
        .with_repeats(allow_repeats)
        .execute()
        .map(|injection| injection.table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::KeepPolicy;
    use crate::exact_dedup::remove_duplicates;
    use crate::hash::{row_fingerprint, table_fingerprint};
    use crate::table::{Row, Value};

    /// `n` distinct rows shaped like the four iris features plus a label
    fn distinct_table(n: usize) -> Table {
        let columns = ["f0", "f1", "f2", "f3", "target"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = (0..n)
            .map(|i| {
                let x = i as f64;
                Row::new(vec![
                    Value::Float(x * 0.1),
                    Value::Float(x * 0.2 + 1.0),
                    Value::Float(x * 0.3 + 2.0),
                    Value::Float(x * 0.4 + 3.0),
                    Value::Int((i % 3) as i64),
                ])
            })
            .collect();
        Table::from_rows(columns, rows).unwrap()
    }

    fn sorted_fingerprints(table: &Table) -> Vec<u64> {
        let mut prints: Vec<u64> = table.rows().iter().map(row_fingerprint).collect();
        prints.sort_unstable();
        prints
    }

    #[test]
    fn test_injected_size_and_prefix() {
        let t = distinct_table(20);
        let out = inject_duplicates(&t, 7, 1, false).unwrap();

        assert_eq!(out.row_count(), 27);
        assert_eq!(&out.rows()[..20], t.rows());
        assert_eq!(out.index(), (0..27).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_appended_rows_match_drawn_positions() {
        let t = distinct_table(30);
        let injection = InjectionRequest::new(&t, 10).with_seed(9).execute().unwrap();

        assert_eq!(injection.injected_count(), 10);
        for (offset, &pos) in injection.source_positions.iter().enumerate() {
            assert_eq!(injection.table.rows()[30 + offset], t.rows()[pos]);
        }
    }

    #[test]
    fn test_without_replacement_draws_distinct_rows() {
        let t = distinct_table(10);
        let injection = InjectionRequest::new(&t, 10).execute().unwrap();

        let mut positions = injection.source_positions.clone();
        positions.sort_unstable();
        assert_eq!(positions, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_with_replacement_may_exceed_population() {
        let t = distinct_table(3);
        let injection = InjectionRequest::new(&t, 50)
            .with_repeats(true)
            .execute()
            .unwrap();

        assert_eq!(injection.table.row_count(), 53);
        assert!(injection.source_positions.iter().all(|&p| p < 3));
    }

    #[test]
    fn test_deterministic() {
        let t = distinct_table(40);
        for allow_repeats in [false, true] {
            let a = inject_duplicates(&t, 25, 1234, allow_repeats).unwrap();
            let b = inject_duplicates(&t, 25, 1234, allow_repeats).unwrap();
            assert_eq!(a, b);
            assert_eq!(table_fingerprint(&a), table_fingerprint(&b));
        }
    }

    #[test]
    fn test_seed_changes_draw() {
        let t = distinct_table(100);
        let a = InjectionRequest::new(&t, 20).with_seed(1).execute().unwrap();
        let b = InjectionRequest::new(&t, 20).with_seed(2).execute().unwrap();
        assert_ne!(a.source_positions, b.source_positions);
    }

    #[test]
    fn test_zero_count_returns_independent_copy() {
        let t = distinct_table(5).select(&[0, 2, 4]);
        let mut copy = inject_duplicates(&t, 0, DEFAULT_SEED, false).unwrap();

        assert_eq!(copy, t);
        assert_eq!(copy.index(), &[0, 2, 4]);

        copy.push_row(Row::new(vec![Value::Null; 5])).unwrap();
        assert_eq!(t.row_count(), 3);
        assert_ne!(copy, t);
    }

    #[test]
    fn test_negative_count_rejected() {
        let t = distinct_table(5);
        let err = inject_duplicates(&t, -1, DEFAULT_SEED, false).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument("count must be non-negative".to_string())
        );
    }

    #[test]
    fn test_over_population_rejected() {
        let t = distinct_table(5);
        let err = inject_duplicates(&t, 6, DEFAULT_SEED, false).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(msg) if msg.contains("population")));

        // The same count is fine with replacement
        assert!(inject_duplicates(&t, 6, DEFAULT_SEED, true).is_ok());
    }

    #[test]
    fn test_empty_population_with_repeats_rejected() {
        let t = Table::new(vec!["a".into()]);
        assert!(matches!(
            inject_duplicates(&t, 1, DEFAULT_SEED, true),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(inject_duplicates(&t, 0, DEFAULT_SEED, true).unwrap(), t);
    }

    #[test]
    fn test_stripping_injected_rows_restores_source() {
        let t = distinct_table(25);
        let out = inject_duplicates(&t, 12, 77, false).unwrap();
        let original: Vec<usize> = (0..t.row_count()).collect();

        assert_eq!(out.select(&original), t);
    }

    #[test]
    fn test_inject_then_dedup_scenario() {
        let t = distinct_table(150);
        let augmented = inject_duplicates(&t, 40, 42, false).unwrap();
        assert_eq!(augmented.row_count(), 190);

        let result = remove_duplicates(&augmented, KeepPolicy::First, true).unwrap();
        assert_eq!(result.duplicates_found, 40);
        assert_eq!(result.cleaned_row_count, 150);
        assert_eq!(sorted_fingerprints(&result.cleaned), sorted_fingerprints(&t));
        assert_eq!(result.cleaned, t);
    }

    #[test]
    fn test_repeats_then_dedup_recovers_source() {
        let t = distinct_table(10);
        let augmented = inject_duplicates(&t, 30, 5, true).unwrap();

        let result = remove_duplicates(&augmented, KeepPolicy::First, false).unwrap();
        assert_eq!(result.duplicates_found, 30);
        assert_eq!(result.cleaned, t);
    }
}
