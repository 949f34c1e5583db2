use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format used when a timestamp cell is rendered as text
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Enum to identify column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    String,
    Integer,
    Float,
    Boolean,
    Timestamp,
}

impl DType {
    /// Returns the tag used in schema listings
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::String => "string",
            DType::Integer => "integer",
            DType::Float => "float",
            DType::Boolean => "boolean",
            DType::Timestamp => "timestamp",
        }
    }

    /// Integer and float columns take part in numeric predicates and statistics
    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Integer | DType::Float)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-null cell value.
///
/// Missing cells are represented as `None` wherever a `Value` is returned,
/// never as a sentinel inside this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns the dtype tag of this value
    pub fn dtype(&self) -> DType {
        match self {
            Value::String(_) => DType::String,
            Value::Integer(_) => DType::Integer,
            Value::Float(_) => DType::Float,
            Value::Boolean(_) => DType::Boolean,
            Value::Timestamp(_) => DType::Timestamp,
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// String view of the value, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Equality that treats integers and floats as one numeric domain
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Converts the value into its JSON representation.
    ///
    /// Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Integer(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Timestamp(ts) => {
                serde_json::Value::String(ts.format(TIMESTAMP_DISPLAY_FORMAT).to_string())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_DISPLAY_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

/// Renders an optional cell, mapping a missing value to JSON `null`
pub fn cell_to_json(cell: Option<&Value>) -> serde_json::Value {
    cell.map(Value::to_json).unwrap_or(serde_json::Value::Null)
}
