//! JSON request surface
//!
//! [`IncidentService::handle`] maps a request path and its decoded query
//! parameters to a status code and JSON body. It performs no I/O, which
//! keeps the whole HTTP contract testable without a socket; the server
//! binary only forwards requests to it.

pub mod params;

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use crate::config::ServiceConfig;
use crate::core::data_value::Value;
use crate::core::error::{Error, Result};
use crate::io::json::{to_records_json, DerivedColumn};
use crate::query::{QueryEngine, RowView, DEFAULT_HAZARD_ISSUE, DEFAULT_RADIUS_KM, ISSUE_COLUMN};
use crate::table::Table;

pub use params::Params;

/// Status code and JSON body of a handled request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: JsonValue,
}

impl ApiResponse {
    pub fn ok(body: JsonValue) -> Self {
        Self { status: 200, body }
    }

    /// Error body `{"error": ..., "kind": ...}` with the error's status
    pub fn from_error(err: &Error) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string(), "kind": err.kind() }),
        }
    }

    pub fn not_found(path: &str) -> Self {
        Self {
            status: 404,
            body: json!({ "error": format!("no such endpoint: {}", path), "kind": "NotFound" }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Shared request handler over one immutable table
#[derive(Debug, Clone)]
pub struct IncidentService {
    table: Option<Arc<Table>>,
    issue_column: String,
    default_head_count: usize,
}

impl IncidentService {
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table: Some(table),
            issue_column: ISSUE_COLUMN.to_string(),
            default_head_count: 5,
        }
    }

    /// A service with no table attached; every query reports `DataNotLoaded`
    pub fn unloaded() -> Self {
        Self {
            table: None,
            issue_column: ISSUE_COLUMN.to_string(),
            default_head_count: 5,
        }
    }

    pub fn from_config(table: Arc<Table>, config: &ServiceConfig) -> Self {
        Self {
            table: Some(table),
            issue_column: config.data.issue_column.clone(),
            default_head_count: config.server.default_head_count,
        }
    }

    /// The loaded table
    pub fn table(&self) -> Result<&Table> {
        self.table.as_deref().ok_or(Error::DataNotLoaded)
    }

    fn engine(&self) -> Result<QueryEngine<'_>> {
        Ok(QueryEngine::new(self.table()?).with_issue_column(&self.issue_column))
    }

    /// Dispatch one request
    pub fn handle(&self, path: &str, params: &Params) -> ApiResponse {
        let result = match path.trim_end_matches('/') {
            "" => Ok(json!({ "message": "Hello World!" })),
            "/head" => self.head(params),
            "/summary" => self.summary(),
            "/describe" => self.describe(),
            "/uniqueval" => self.unique_values(params),
            "/year" => self.years(),
            "/hazard_count" => self.hazard_count(params),
            "/hour" => self.hours(),
            "/by_hour_range" => self.by_hour_range(params),
            "/nearby_incidents" => self.nearby(params),
            "/cleaned_geo" => self.cleaned_geo(),
            "/rush_hour" => self.rush_hour(),
            "/rush_hour_nearby" => self.rush_hour_nearby(params),
            _ => {
                log::debug!("unknown endpoint {}", path);
                return ApiResponse::not_found(path);
            }
        };

        match result {
            Ok(body) => ApiResponse::ok(body),
            Err(err) => {
                if err.is_client_error() {
                    log::debug!("{} rejected: {}", path, err);
                } else {
                    log::warn!("{} failed: {}", path, err);
                }
                ApiResponse::from_error(&err)
            }
        }
    }

    fn incidents(&self, view: &RowView, extras: &[DerivedColumn]) -> Result<JsonValue> {
        to_records_json(self.table()?, view, extras)
    }

    fn listing(&self, view: &RowView, extras: &[DerivedColumn]) -> Result<JsonValue> {
        Ok(json!({
            "count": view.len(),
            "incidents": self.incidents(view, extras)?,
        }))
    }

    fn head(&self, params: &Params) -> Result<JsonValue> {
        let n = params::parse_count(params::optional(params, "count"), self.default_head_count)?;
        let view = self.engine()?.head(n)?;
        self.listing(&view, &[])
    }

    fn summary(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self.engine()?.summary())?)
    }

    fn describe(&self) -> Result<JsonValue> {
        let mut body = serde_json::Map::new();
        for description in self.engine()?.describe() {
            body.insert(description.column, serde_json::to_value(description.stats)?);
        }
        Ok(JsonValue::Object(body))
    }

    fn unique_values(&self, params: &Params) -> Result<JsonValue> {
        let column = params::required(params, "column")?;
        let unique = self.engine()?.unique_values(column)?;
        Ok(json!({
            "column": unique.column,
            "unique_values": unique.values.iter().map(Value::to_json).collect::<Vec<_>>(),
            "count": unique.count,
        }))
    }

    fn years(&self) -> Result<JsonValue> {
        Ok(json!({ "years": self.engine()?.years()? }))
    }

    fn hazard_count(&self, params: &Params) -> Result<JsonValue> {
        let year = params::parse_int("year", params::required(params, "year")?)?;
        let full = params::parse_flag("full", params::optional(params, "full"))?;
        let issue = params::optional(params, "issue").unwrap_or(DEFAULT_HAZARD_ISSUE);

        let rows = self.engine()?.hazards_by_year(year, issue)?;
        let mut body = json!({ "year": year, "issue": issue, "count": rows.len() });
        if full {
            body["incidents"] = self.incidents(&rows, &[])?;
        }
        Ok(body)
    }

    fn hours(&self) -> Result<JsonValue> {
        Ok(json!({ "hour_counts": self.engine()?.hour_frequencies()? }))
    }

    fn by_hour_range(&self, params: &Params) -> Result<JsonValue> {
        let start = params::parse_hour("start", params::required(params, "start")?)?;
        let end = params::parse_hour("end", params::required(params, "end")?)?;
        let view = self.engine()?.filter_by_hour_range(start, end)?;
        Ok(json!({
            "start": start,
            "end": end,
            "count": view.len(),
            "incidents": self.incidents(&view, &[])?,
        }))
    }

    fn point(params: &Params) -> Result<(f64, f64, f64)> {
        let lat = params::parse_latitude(params::required(params, "lat")?)?;
        let lon = params::parse_longitude(params::required(params, "lon")?)?;
        let radius = params::parse_radius(params::optional(params, "radius"), DEFAULT_RADIUS_KM)?;
        Ok((lat, lon, radius))
    }

    fn nearby(&self, params: &Params) -> Result<JsonValue> {
        let (lat, lon, radius) = Self::point(params)?;
        let nearby = self.engine()?.nearby(lat, lon, radius)?;
        self.listing(&nearby.rows, &[nearby.distance_column()])
    }

    fn cleaned_geo(&self) -> Result<JsonValue> {
        let view = self.engine()?.cleaned_geo()?;
        self.listing(&view, &[])
    }

    fn rush_hour(&self) -> Result<JsonValue> {
        let engine = self.engine()?;
        let view = engine.rush_hour_filter()?;
        let flags = engine.rush_hour_flags(&view)?;
        self.listing(&view, &[flags])
    }

    fn rush_hour_nearby(&self, params: &Params) -> Result<JsonValue> {
        let (lat, lon, radius) = Self::point(params)?;
        let year = params::parse_int("year", params::required(params, "year")?)?;
        let nearby = self.engine()?.rush_hour_nearby(lat, lon, year, radius)?;
        self.listing(&nearby.rows, &[nearby.distance_column()])
    }
}
