//! Alignment table column model
//!
//! Column types for BLAST-style tabular alignment output and the renames
//! that map newer output names onto the canonical ones.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Str,
    Int,
    Float,
}

impl ColumnType {
    /// Whether `value` is valid for this type. Empty cells are missing
    /// values and always accepted.
    pub fn check(self, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }
        match self {
            ColumnType::Str => true,
            ColumnType::Int => value.parse::<i64>().is_ok(),
            ColumnType::Float => value.parse::<f64>().is_ok(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Str => "a string",
            ColumnType::Int => "an integer",
            ColumnType::Float => "a number",
        };
        f.write_str(name)
    }
}

/// Type of a known alignment column
pub fn column_type(name: &str) -> Option<ColumnType> {
    use ColumnType::*;

    let dtype = match name {
        "accession" | "assignment_id" | "assignment_rank" | "assignment_tax_id"
        | "assignment_tax_name" | "condensed_id" | "qaccver" | "qseqid" | "rank" | "saccver"
        | "specimen" | "sseqid" | "staxid" | "tax_id" | "tax_name" => Str,
        "bitscore" | "evalue" | "mismatch" | "pident" | "qcovs" => Float,
        "gapopen" | "length" | "qcovhsp" | "qend" | "qstart" | "send" | "sstart" => Int,
        _ => return None,
    };
    Some(dtype)
}

/// Canonical name for a column
pub fn canonical_column(name: &str) -> &str {
    match name {
        "qaccver" => "qseqid",
        "saccver" => "sseqid",
        other => other,
    }
}
