//! Error types for classifier-core
//!
//! Strongly-typed errors for table parsing and settings loading,
//! using thiserror for the trait implementations.

use std::path::PathBuf;
use thiserror::Error;

use crate::alignment::ColumnType;

/// Errors raised while reading an alignment table
#[derive(Debug, Error)]
pub enum TableError {
    /// Input had no header line
    #[error("Table is empty: expected a header line")]
    Empty,

    /// A requested column is not in the header
    #[error("Column '{name}' not found in header")]
    MissingColumn { name: String },

    /// A row has a different width than the header
    #[error("Line {line}: expected {expected} fields, found {found}")]
    Ragged { line: usize, expected: usize, found: usize },

    /// A typed column holds a value of the wrong type
    #[error("Line {line}: column '{column}' expects {expected}, got '{value}'")]
    BadValue { line: usize, column: String, value: String, expected: ColumnType },

    /// Underlying read failure
    #[error("Failed to read table: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings from {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Invalid settings in {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}
