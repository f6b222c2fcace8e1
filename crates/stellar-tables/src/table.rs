//! Whitespace-separated column files.
//!
//! Input tables are plain text: one header row naming the columns, one row
//! per entry, fields separated by runs of whitespace, `#` starting a
//! comment. Values stay as raw strings until a typed accessor is called.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Data-validation failures while loading or consuming an input table.
///
/// These fail fast at construction time and abort processing for the
/// affected input set only; other inputs are unaffected.
#[derive(Debug, Error)]
pub enum TableError {
    /// A required column is absent from the header row.
    #[error("column '{name}' missing from the input table")]
    MissingColumn { name: String },

    /// A required column is present but holds no rows.
    #[error("column '{name}' is empty")]
    EmptyColumn { name: String },

    /// A cell could not be parsed as a number.
    #[error("column '{name}' holds non-numeric value '{value}'")]
    NotNumeric { name: String, value: String },

    /// A data row does not line up with the header.
    #[error("row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// The file contains no header row at all.
    #[error("no header row found")]
    NoHeader,

    /// No metallicity-tagged columns with the given prefix exist.
    #[error("no usable metallicity-tagged '{prefix}' columns in the table")]
    NoTaggedColumns { prefix: String },

    /// The reference-mass column is not strictly ascending.
    #[error("reference masses must be strictly ascending")]
    UnsortedMasses,

    #[error("failed to read table: {0}")]
    Io(#[from] std::io::Error),
}

/// An in-memory column table.
#[derive(Debug, Clone)]
pub struct DataTable {
    headers: Vec<String>,
    columns: HashMap<String, Vec<String>>,
}

impl DataTable {
    /// Reads a table from a file, validating the required columns.
    pub fn read<P: AsRef<Path>>(path: P, required: &[&str]) -> Result<Self, TableError> {
        Self::parse(&fs::read_to_string(path)?, required)
    }

    /// Parses a table from text.
    ///
    /// Every name in `required` must appear in the header row and hold at
    /// least one row of data; other columns are carried along untouched.
    ///
    /// # Errors
    /// `NoHeader`, `RaggedRow`, `MissingColumn` or `EmptyColumn`.
    pub fn parse(src: &str, required: &[&str]) -> Result<Self, TableError> {
        let mut lines = src.lines().filter_map(|line| {
            let line = line.split('#').next().unwrap_or("").trim();
            (!line.is_empty()).then_some(line)
        });

        let headers: Vec<String> = lines
            .next()
            .ok_or(TableError::NoHeader)?
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        let mut columns: HashMap<String, Vec<String>> = headers
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();

        for (row, line) in lines.enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();

            if fields.len() != headers.len() {
                return Err(TableError::RaggedRow {
                    row: row + 1,
                    found: fields.len(),
                    expected: headers.len(),
                });
            }

            for (name, field) in headers.iter().zip(fields) {
                columns
                    .get_mut(name)
                    .expect("every header has a column")
                    .push(field.to_owned());
            }
        }

        let table = Self { headers, columns };

        for name in required {
            let column = table.text(name)?;

            if column.is_empty() {
                return Err(TableError::EmptyColumn {
                    name: (*name).to_owned(),
                });
            }
        }

        Ok(table)
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn rows(&self) -> usize {
        self.headers
            .first()
            .map_or(0, |name| self.columns[name].len())
    }

    /// A column's raw string values.
    pub fn text(&self, name: &str) -> Result<&[String], TableError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| TableError::MissingColumn {
                name: name.to_owned(),
            })
    }

    /// A column parsed to `f64`.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>, TableError> {
        self.text(name)?
            .iter()
            .map(|value| {
                value.parse().map_err(|_| TableError::NotNumeric {
                    name: name.to_owned(),
                    value: value.clone(),
                })
            })
            .collect()
    }
}
