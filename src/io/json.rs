use serde_json::{Map, Value as JsonValue};

use crate::core::data_value::{cell_to_json, Value};
use crate::core::error::{Error, Result};
use crate::query::RowView;
use crate::table::Table;

/// One materialized row: column name to JSON value, in schema order
pub type Record = Map<String, JsonValue>;

/// Per-row values computed for a request, aligned with a [`RowView`]
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumn {
    pub name: String,
    pub values: Vec<Option<Value>>,
}

impl DerivedColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<Value>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Render the rows of `view` as records.
///
/// Row order follows the view; every table column appears in schema order,
/// followed by the derived columns. NULL cells become JSON `null`.
pub fn materialize(table: &Table, view: &RowView, extras: &[DerivedColumn]) -> Result<Vec<Record>> {
    for extra in extras {
        if extra.values.len() != view.len() {
            return Err(Error::Schema(format!(
                "derived column {} has {} values for {} rows",
                extra.name,
                extra.values.len(),
                view.len()
            )));
        }
    }

    let mut records = Vec::with_capacity(view.len());
    for (pos, row) in view.iter().enumerate() {
        if row >= table.row_count() {
            return Err(Error::IndexOutOfBounds {
                index: row,
                size: table.row_count(),
            });
        }

        let mut record = Map::new();
        for (name, column) in table.columns() {
            record.insert(name.to_string(), cell_to_json(column.get(row).as_ref()));
        }
        for extra in extras {
            record.insert(extra.name.clone(), cell_to_json(extra.values[pos].as_ref()));
        }
        records.push(record);
    }

    Ok(records)
}

/// Record-oriented JSON array, `[{col1: val1, ...}, ...]`
pub fn to_records_json(table: &Table, view: &RowView, extras: &[DerivedColumn]) -> Result<JsonValue> {
    let records = materialize(table, view, extras)?;
    Ok(JsonValue::Array(
        records.into_iter().map(JsonValue::Object).collect(),
    ))
}
