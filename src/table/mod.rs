//! Immutable columnar table
//!
//! A [`Table`] is built once (normally by [`crate::io::load`]) and only read
//! afterwards. Every query borrows it; nothing writes back into it.

use std::collections::HashMap;

use serde::Serialize;

use crate::column::Column;
use crate::core::data_value::{DType, Value};
use crate::core::error::{Error, Result};

/// Ordered, fixed-schema collection of equally long columns
#[derive(Debug, Clone, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    positions: HashMap<String, usize>,
    row_count: usize,
}

/// Per-column schema entry reported by [`Table::summary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: DType,
    pub null_count: usize,
    pub non_null_count: usize,
}

/// Schema and null statistics for every column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub row_count: usize,
    pub columns: Vec<ColumnInfo>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns, keeping their order.
    ///
    /// Fails when two columns share a name or their lengths differ.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self> {
        let mut table = Table::new();
        for (name, column) in columns {
            table.push_column(name.into(), column)?;
        }
        Ok(table)
    }

    fn push_column(&mut self, name: String, column: Column) -> Result<()> {
        if self.positions.contains_key(&name) {
            return Err(Error::Schema(format!("duplicate column name: {}", name)));
        }
        if self.columns.is_empty() {
            self.row_count = column.len();
        } else if column.len() != self.row_count {
            return Err(Error::Schema(format!(
                "column {} has {} rows, expected {}",
                name,
                column.len(),
                self.row_count
            )));
        }

        self.positions.insert(name.clone(), self.columns.len());
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Column names in schema order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether a column with this name exists
    pub fn contains_column(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.positions
            .get(name)
            .map(|&pos| &self.columns[pos])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Iterate `(name, column)` pairs in schema order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Cell at `(column, row)`; `Ok(None)` for NULL
    pub fn get(&self, column: &str, row: usize) -> Result<Option<Value>> {
        let col = self.column(column)?;
        if row >= self.row_count {
            return Err(Error::IndexOutOfBounds {
                index: row,
                size: self.row_count,
            });
        }
        Ok(col.get(row))
    }

    /// Dtype tag of a column
    pub fn dtype(&self, column: &str) -> Result<DType> {
        Ok(self.column(column)?.dtype())
    }

    /// NULL count of a column
    pub fn null_count(&self, column: &str) -> Result<usize> {
        Ok(self.column(column)?.null_count())
    }

    /// Schema of every column, in order
    pub fn summary(&self) -> TableSummary {
        let columns = self
            .columns()
            .map(|(name, col)| {
                let null_count = col.null_count();
                ColumnInfo {
                    name: name.to_string(),
                    dtype: col.dtype(),
                    null_count,
                    non_null_count: self.row_count - null_count,
                }
            })
            .collect();

        TableSummary {
            row_count: self.row_count,
            columns,
        }
    }
}
