//! Table readers and writers for dataset files
//!
//! This crate loads JSON Lines and CSV files into [`tabdedup_core::Table`]s,
//! writes tables back out, and ships the Iris reference dataset.

pub mod csv_table;
pub mod error;
pub mod iris;
pub mod jsonl;
pub mod reader;

pub use error::{Error, Result};
pub use iris::load_iris;
pub use reader::{open_table, write_table, TableFormat};
