//! Tab-separated alignment table reader
//!
//! Header names are canonicalized and typed columns are validated while
//! reading, so later stages can trust every cell.

use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::debug;

use crate::alignment::{canonical_column, column_type};
use crate::error::TableError;

/// A parsed table; rows keep their input order
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a table, applying `renames` after the built-in column renames.
    pub fn read<R: BufRead>(reader: R, renames: &BTreeMap<String, String>) -> Result<Self, TableError> {
        let mut lines = reader.lines();
        let header_line = lines.next().ok_or(TableError::Empty)??;

        let header: Vec<String> = header_line
            .split('\t')
            .map(|name| {
                let name = canonical_column(name);
                renames.get(name).map(String::as_str).unwrap_or(name).to_string()
            })
            .collect();
        let types: Vec<_> = header.iter().map(|name| column_type(name)).collect();

        let mut rows = Vec::new();
        for (index, line) in lines.enumerate() {
            let line = line?;
            // header is line 1
            let line_no = index + 2;
            if line.is_empty() {
                continue;
            }

            let row: Vec<String> = line.split('\t').map(str::to_string).collect();
            if row.len() != header.len() {
                return Err(TableError::Ragged { line: line_no, expected: header.len(), found: row.len() });
            }

            for ((value, dtype), column) in row.iter().zip(&types).zip(&header) {
                if let Some(dtype) = dtype {
                    if !dtype.check(value) {
                        return Err(TableError::BadValue {
                            line: line_no,
                            column: column.clone(),
                            value: value.clone(),
                            expected: *dtype,
                        });
                    }
                }
            }
            rows.push(row);
        }

        debug!("read {} rows with {} columns", rows.len(), header.len());
        Ok(Self { header, rows })
    }

    /// Index of a column by name
    pub fn column(&self, name: &str) -> Result<usize, TableError> {
        let name = canonical_column(name);
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> Result<Table, TableError> {
        Table::read(Cursor::new(text), &BTreeMap::new())
    }

    #[test]
    fn test_header_is_canonicalized() {
        let table = read("qaccver\tsaccver\tpident\nq1\ts1\t99.1\n").unwrap();
        assert_eq!(table.header, vec!["qseqid", "sseqid", "pident"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.column("qaccver").unwrap(), 0);
    }

    #[test]
    fn test_custom_renames() {
        let renames = BTreeMap::from([("query".to_string(), "qseqid".to_string())]);
        let table = Table::read(Cursor::new("query\tbitscore\nq1\t50\n"), &renames).unwrap();
        assert_eq!(table.column("qseqid").unwrap(), 0);
    }

    #[test]
    fn test_bad_value_reports_line_and_column() {
        let err = read("qseqid\tqstart\nq1\t10\nq2\tten\n").unwrap_err();
        match err {
            TableError::BadValue { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "qstart");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_values_are_allowed() {
        let table = read("qseqid\tevalue\nq1\t\n").unwrap();
        assert_eq!(table.rows[0], vec!["q1", ""]);
    }

    #[test]
    fn test_ragged_row() {
        let err = read("qseqid\tsseqid\nq1\n").unwrap_err();
        assert!(matches!(err, TableError::Ragged { line: 2, expected: 2, found: 1 }));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(read(""), Err(TableError::Empty)));
    }

    #[test]
    fn test_unknown_column_lookup() {
        let table = read("qseqid\nq1\n").unwrap();
        assert!(matches!(table.column("staxid"), Err(TableError::MissingColumn { .. })));
    }
}
