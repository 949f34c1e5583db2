pub mod csv;
pub mod json;

// Re-export commonly used functions
pub use csv::{
    load, load_from_reader, load_with_options, parse_timestamp, LoadOptions,
    DEFAULT_TIMESTAMP_COLUMN, DEFAULT_TIMESTAMP_FORMATS, HOUR_COLUMN, YEAR_COLUMN,
};
pub use json::{materialize, DerivedColumn, Record};
