//! In-memory query engine for traffic incident snapshots.
//!
//! A CSV snapshot is loaded once into an immutable, columnar [`Table`];
//! [`QueryEngine`] answers previews, schema and statistics questions,
//! categorical and time-of-day filters, and proximity searches over it, and
//! [`io::materialize`] renders the resulting row views as JSON records.
//!
//! ```no_run
//! use incidentframe::{io, QueryEngine};
//!
//! let table = io::load("traffic_incidents.csv")?;
//! let engine = QueryEngine::new(&table);
//! let nearby = engine.nearby(30.2895, -97.7368, 1.0)?;
//! println!("{} incidents within 1 km", nearby.len());
//! # Ok::<(), incidentframe::Error>(())
//! ```

// Core module with fundamental data structures and errors
pub mod core;

pub mod column;
pub mod config;
pub mod io;
pub mod query;
pub mod stats;
pub mod table;
pub mod web;

// Re-export core types
pub use crate::core::data_value::{DType, Value};
pub use crate::core::error::{Error, Result};

pub use column::{Column, TypedColumn};
pub use config::ServiceConfig;
pub use io::{load, load_with_options, materialize, DerivedColumn, LoadOptions, Record};
pub use query::{NearbyRows, Predicate, QueryEngine, RowView};
pub use stats::DescriptiveStats;
pub use table::{Table, TableSummary};
pub use web::{ApiResponse, IncidentService};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
