// Core data structures and traits shared by every other module
pub mod data_value;
pub mod error;

pub use data_value::{cell_to_json, DType, Value};
pub use error::{Error, Result};
