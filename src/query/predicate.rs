//! Row predicates
//!
//! A [`Predicate`] describes a test over a single row. It is bound against a
//! table once per query, which resolves column names and checks types, and
//! the bound form is then evaluated row by row. Comparisons never match a
//! NULL cell; only [`Predicate::IsNull`] does.

use crate::column::Column;
use crate::core::data_value::Value;
use crate::core::error::{Error, Result};
use crate::query::geo::haversine_km;
use crate::table::Table;

/// Bound predicate: row index to match
pub type RowTest<'t> = Box<dyn Fn(usize) -> bool + Send + Sync + 't>;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Cell equals the value (integers and floats compare numerically)
    Equals { column: String, value: Value },
    /// Cell is present and differs from the value
    NotEquals { column: String, value: Value },
    /// String cell contains the needle, ignoring case
    Contains { column: String, needle: String },
    /// Numeric cell lies in `[min, max]`
    Between { column: String, min: f64, max: f64 },
    IsNull(String),
    NotNull(String),
    /// Point given by two numeric columns lies within `radius_km` of `(lat, lon)`
    Within {
        lat_column: String,
        lon_column: String,
        lat: f64,
        lon: f64,
        radius_km: f64,
    },
    /// Logical AND; an empty list matches every row
    All(Vec<Predicate>),
    /// Logical OR; an empty list matches no row
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::NotEquals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn contains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Predicate::Contains {
            column: column.into(),
            needle: needle.into(),
        }
    }

    pub fn between(column: impl Into<String>, min: f64, max: f64) -> Self {
        Predicate::Between {
            column: column.into(),
            min,
            max,
        }
    }

    pub fn at_most(column: impl Into<String>, max: f64) -> Self {
        Self::between(column, f64::NEG_INFINITY, max)
    }

    /// Combine with another predicate by logical AND
    pub fn and(self, other: Predicate) -> Predicate {
        match self {
            Predicate::All(mut parts) => {
                parts.push(other);
                Predicate::All(parts)
            }
            first => Predicate::All(vec![first, other]),
        }
    }

    /// Resolve columns against `table` and produce a row test
    pub fn bind<'t>(&self, table: &'t Table) -> Result<RowTest<'t>> {
        match self {
            Predicate::Equals { column, value } => {
                let col = table.column(column)?;
                let value = value.clone();
                Ok(Box::new(move |row| cell_equals(col, row, &value)))
            }
            Predicate::NotEquals { column, value } => {
                let col = table.column(column)?;
                let value = value.clone();
                Ok(Box::new(move |row| {
                    !col.is_null(row) && !cell_equals(col, row, &value)
                }))
            }
            Predicate::Contains { column, needle } => {
                let col = table.column(column)?;
                if !matches!(col, Column::String(_)) {
                    return Err(Error::Schema(format!(
                        "column {} is {}, substring match needs string",
                        column,
                        col.dtype()
                    )));
                }
                let needle = needle.to_lowercase();
                Ok(Box::new(move |row| {
                    col.str_at(row)
                        .map(|s| s.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                }))
            }
            Predicate::Between { column, min, max } => {
                let col = numeric_column(table, column)?;
                let (min, max) = (*min, *max);
                Ok(Box::new(move |row| {
                    col.f64_at(row)
                        .map(|v| v >= min && v <= max)
                        .unwrap_or(false)
                }))
            }
            Predicate::IsNull(column) => {
                let col = table.column(column)?;
                Ok(Box::new(move |row| col.is_null(row)))
            }
            Predicate::NotNull(column) => {
                let col = table.column(column)?;
                Ok(Box::new(move |row| !col.is_null(row)))
            }
            Predicate::Within {
                lat_column,
                lon_column,
                lat,
                lon,
                radius_km,
            } => {
                let lat_col = numeric_column(table, lat_column)?;
                let lon_col = numeric_column(table, lon_column)?;
                let (lat, lon, radius_km) = (*lat, *lon, *radius_km);
                Ok(Box::new(move |row| {
                    match (lat_col.f64_at(row), lon_col.f64_at(row)) {
                        (Some(row_lat), Some(row_lon)) => {
                            haversine_km(lat, lon, row_lat, row_lon) <= radius_km
                        }
                        _ => false,
                    }
                }))
            }
            Predicate::All(parts) => {
                let tests = parts
                    .iter()
                    .map(|p| p.bind(table))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Box::new(move |row| tests.iter().all(|t| t(row))))
            }
            Predicate::Any(parts) => {
                let tests = parts
                    .iter()
                    .map(|p| p.bind(table))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Box::new(move |row| tests.iter().any(|t| t(row))))
            }
        }
    }
}

fn numeric_column<'t>(table: &'t Table, name: &str) -> Result<&'t Column> {
    let col = table.column(name)?;
    if !col.dtype().is_numeric() {
        return Err(Error::Schema(format!(
            "column {} is {}, expected a numeric column",
            name,
            col.dtype()
        )));
    }
    Ok(col)
}

fn cell_equals(col: &Column, row: usize, value: &Value) -> bool {
    match value {
        Value::String(s) => col.str_at(row) == Some(s.as_str()),
        other => col
            .get(row)
            .map(|cell| cell.loosely_equals(other))
            .unwrap_or(false),
    }
}
