//! Core deduplication logic for in-memory tables
//!
//! This crate provides the table model, whole-row duplicate detection and
//! removal under a keep-policy, and seeded duplicate injection for building
//! test fixtures.

pub mod error;
pub mod table;
pub mod hash;
pub mod dedup;
pub mod exact_dedup;
pub mod inject;

pub use dedup::{duplicated, KeepPolicy};
pub use error::{Error, Result};
pub use exact_dedup::{remove_duplicates, DeduplicationResult, ExactDeduplicator};
pub use inject::{inject_duplicates, Injection, InjectionRequest, DEFAULT_SEED};
pub use table::{Row, Table, Value};
