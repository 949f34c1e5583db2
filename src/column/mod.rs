mod common;
mod typed_column;

use std::collections::HashSet;
use std::hash::Hash;

use chrono::NaiveDateTime;

use crate::core::data_value::{DType, Value};

pub use common::{utils, BitMask};
pub use typed_column::TypedColumn;

pub type StringColumn = TypedColumn<String>;
pub type Int64Column = TypedColumn<i64>;
pub type Float64Column = TypedColumn<f64>;
pub type BooleanColumn = TypedColumn<bool>;
pub type TimestampColumn = TypedColumn<NaiveDateTime>;

/// Enum representing a column
#[derive(Debug, Clone)]
pub enum Column {
    String(StringColumn),
    Int64(Int64Column),
    Float64(Float64Column),
    Boolean(BooleanColumn),
    Timestamp(TimestampColumn),
}

impl Column {
    /// Returns the length of the column
    pub fn len(&self) -> usize {
        match self {
            Column::String(col) => col.len(),
            Column::Int64(col) => col.len(),
            Column::Float64(col) => col.len(),
            Column::Boolean(col) => col.len(),
            Column::Timestamp(col) => col.len(),
        }
    }

    /// Returns whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the type of the column
    pub fn dtype(&self) -> DType {
        match self {
            Column::String(_) => DType::String,
            Column::Int64(_) => DType::Integer,
            Column::Float64(_) => DType::Float,
            Column::Boolean(_) => DType::Boolean,
            Column::Timestamp(_) => DType::Timestamp,
        }
    }

    /// Number of NULL rows
    pub fn null_count(&self) -> usize {
        match self {
            Column::String(col) => col.null_count(),
            Column::Int64(col) => col.null_count(),
            Column::Float64(col) => col.null_count(),
            Column::Boolean(col) => col.null_count(),
            Column::Timestamp(col) => col.null_count(),
        }
    }

    /// Whether the row holds NULL
    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Column::String(col) => col.is_null(row),
            Column::Int64(col) => col.is_null(row),
            Column::Float64(col) => col.is_null(row),
            Column::Boolean(col) => col.is_null(row),
            Column::Timestamp(col) => col.is_null(row),
        }
    }

    /// Typed value at `row`, `None` when NULL
    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            Column::String(col) => col.value(row).cloned().map(Value::String),
            Column::Int64(col) => col.value(row).copied().map(Value::Integer),
            Column::Float64(col) => col.value(row).copied().map(Value::Float),
            Column::Boolean(col) => col.value(row).copied().map(Value::Boolean),
            Column::Timestamp(col) => col.value(row).copied().map(Value::Timestamp),
        }
    }

    /// Numeric value at `row`; `None` for NULL or non-numeric columns
    pub fn f64_at(&self, row: usize) -> Option<f64> {
        match self {
            Column::Int64(col) => col.value(row).map(|&v| v as f64),
            Column::Float64(col) => col.value(row).copied(),
            _ => None,
        }
    }

    /// Integer value at `row`; `None` for NULL or non-integer columns
    pub fn i64_at(&self, row: usize) -> Option<i64> {
        match self {
            Column::Int64(col) => col.value(row).copied(),
            _ => None,
        }
    }

    /// String value at `row`; `None` for NULL or non-string columns
    pub fn str_at(&self, row: usize) -> Option<&str> {
        match self {
            Column::String(col) => col.value(row).map(String::as_str),
            _ => None,
        }
    }

    /// All non-NULL values of a numeric column, in storage order
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        if !self.dtype().is_numeric() {
            return None;
        }
        Some((0..self.len()).filter_map(|row| self.f64_at(row)).collect())
    }

    /// Distinct non-NULL values in first-occurrence order
    pub fn unique(&self) -> Vec<Value> {
        match self {
            Column::String(col) => first_occurrences(col, |v| v.as_str())
                .into_iter()
                .map(|v| Value::String(v.clone()))
                .collect(),
            Column::Int64(col) => first_occurrences(col, |v| *v)
                .into_iter()
                .map(|v| Value::Integer(*v))
                .collect(),
            // -0.0 and 0.0 share a key, every NaN payload collapses to one
            Column::Float64(col) => first_occurrences(col, |v| float_key(*v))
                .into_iter()
                .map(|v| Value::Float(*v))
                .collect(),
            Column::Boolean(col) => first_occurrences(col, |v| *v)
                .into_iter()
                .map(|v| Value::Boolean(*v))
                .collect(),
            Column::Timestamp(col) => first_occurrences(col, |v| *v)
                .into_iter()
                .map(|v| Value::Timestamp(*v))
                .collect(),
        }
    }
}

fn float_key(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

fn first_occurrences<'a, T, K, F>(col: &'a TypedColumn<T>, key: F) -> Vec<&'a T>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let mut seen = HashSet::new();
    col.iter()
        .flatten()
        .filter(|v| seen.insert(key(*v)))
        .collect()
}

impl From<StringColumn> for Column {
    fn from(col: StringColumn) -> Self {
        Column::String(col)
    }
}

impl From<Int64Column> for Column {
    fn from(col: Int64Column) -> Self {
        Column::Int64(col)
    }
}

impl From<Float64Column> for Column {
    fn from(col: Float64Column) -> Self {
        Column::Float64(col)
    }
}

impl From<BooleanColumn> for Column {
    fn from(col: BooleanColumn) -> Self {
        Column::Boolean(col)
    }
}

impl From<TimestampColumn> for Column {
    fn from(col: TimestampColumn) -> Self {
        Column::Timestamp(col)
    }
}
