use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use csv::ReaderBuilder;

use crate::column::{
    BooleanColumn, Column, Float64Column, Int64Column, StringColumn, TimestampColumn,
};
use crate::core::error::{Error, Result};
use crate::table::Table;

/// Column parsed as a timestamp when present
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "Published Date";

/// Derived column holding the calendar year of the timestamp
pub const YEAR_COLUMN: &str = "Year";

/// Derived column holding the hour (0-23) of the timestamp
pub const HOUR_COLUMN: &str = "Hour";

/// Formats tried, in order, after RFC 3339. Formats carrying `%z` keep the
/// wall-clock time as written and drop the offset.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y %b %d %I:%M:%S %p %z",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %I:%M:%S %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y %b %d %I:%M:%S %p",
    "%Y-%m-%d",
    "%m/%d/%Y",
];

/// Cell text read as NULL, beside the empty field
pub const NULL_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "#N/A N/A", "#NA", "<NA>", "-1.#IND", "1.#IND", "-1.#QNAN", "1.#QNAN",
];

/// Options controlling how a CSV snapshot is typed
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Column parsed as a timestamp and used to derive `Year`/`Hour`
    pub timestamp_column: String,
    /// chrono formats tried after RFC 3339
    pub timestamp_formats: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

/// Read a table from a CSV file with default options
pub fn load<P: AsRef<Path>>(path: P) -> Result<Table> {
    load_with_options(path, &LoadOptions::default())
}

/// Read a table from a CSV file
pub fn load_with_options<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::Load(format!("cannot open {}: {}", path.display(), e)))?;

    let table = load_from_reader(file, options)
        .map_err(|e| match e {
            Error::Load(msg) => Error::Load(format!("{}: {}", path.display(), msg)),
            other => Error::Load(format!("{}: {}", path.display(), describe_source(&other))),
        })?;

    log::info!(
        "loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

fn describe_source(err: &Error) -> String {
    match err {
        Error::Io(e) => e.to_string(),
        Error::Csv(e) => e.to_string(),
        other => other.to_string(),
    }
}

/// Read a table from any CSV byte source. A header row is required.
pub fn load_from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = dedupe_headers(rdr.headers()?.iter().map(str::to_string).collect());
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(Error::Load("file is empty".to_string()));
    }

    // Collect raw cells column by column, empty fields becoming NULL
    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for result in rdr.records() {
        let record = result?;
        for (i, cells) in raw.iter_mut().enumerate() {
            let cell = record.get(i).filter(|s| !is_null_token(s)).map(str::to_string);
            cells.push(cell);
        }
    }

    let mut columns: Vec<(String, Column)> = Vec::with_capacity(headers.len() + 2);
    let mut timestamps: Option<TimestampColumn> = None;

    for (name, cells) in headers.into_iter().zip(raw) {
        if name == options.timestamp_column {
            let (col, failures) = parse_timestamps(&cells, &options.timestamp_formats);
            if failures > 0 {
                log::warn!(
                    "{} value(s) in {:?} could not be parsed and were set to null",
                    failures,
                    name
                );
            }
            timestamps = Some(col.clone());
            columns.push((name, Column::Timestamp(col)));
        } else {
            columns.push((name, infer_column(cells)));
        }
    }

    match timestamps {
        Some(ts) => {
            let (year, hour) = derive_year_hour(&ts);
            put_derived(&mut columns, YEAR_COLUMN, Column::Int64(year));
            put_derived(&mut columns, HOUR_COLUMN, Column::Int64(hour));
        }
        None => log::debug!(
            "timestamp column {:?} absent, {} and {} not derived",
            options.timestamp_column,
            YEAR_COLUMN,
            HOUR_COLUMN
        ),
    }

    Table::from_columns(columns)
}

/// Derived columns overwrite a source column of the same name in place,
/// otherwise they are appended
fn put_derived(columns: &mut Vec<(String, Column)>, name: &str, column: Column) {
    match columns.iter_mut().find(|(existing, _)| existing.as_str() == name) {
        Some(slot) => {
            log::warn!("source column {:?} replaced by the derived values", name);
            slot.1 = column;
        }
        None => columns.push((name.to_string(), column)),
    }
}

fn is_null_token(s: &str) -> bool {
    s.is_empty() || NULL_TOKENS.contains(&s)
}

/// Repeated header names get a `.N` suffix so every column stays addressable
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .into_iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name;
            }
            let mut n = 1;
            loop {
                let candidate = format!("{}.{}", name, n);
                if seen.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

/// Pick the narrowest type every non-null cell parses as
fn infer_column(cells: Vec<Option<String>>) -> Column {
    let present = || cells.iter().flatten();

    if present().all(|s| s.parse::<i64>().is_ok()) && present().next().is_some() {
        return Column::Int64(Int64Column::from_options(
            cells.iter().map(|c| c.as_ref().and_then(|s| s.parse().ok())).collect(),
        ));
    }
    // All-null columns land here as all-NaN floats; "inf" is text, not a number
    if present().all(|s| s.parse::<f64>().map_or(false, f64::is_finite)) {
        return Column::Float64(Float64Column::from_options(
            cells.iter().map(|c| c.as_ref().and_then(|s| s.parse().ok())).collect(),
        ));
    }
    if present().all(|s| parse_bool(s).is_some()) {
        return Column::Boolean(BooleanColumn::from_options(
            cells.iter().map(|c| c.as_deref().and_then(parse_bool)).collect(),
        ));
    }
    Column::String(StringColumn::from_options(cells))
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse one timestamp: RFC 3339, then each format.
///
/// Values with an offset keep their local wall-clock time, so `Hour` is the
/// hour as written in the source.
pub fn parse_timestamp(s: &str, formats: &[String]) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    formats.iter().find_map(|fmt| {
        if fmt.contains("%z") {
            return DateTime::parse_from_str(s, fmt).ok().map(|dt| dt.naive_local());
        }
        NaiveDateTime::parse_from_str(s, fmt).ok().or_else(|| {
            NaiveDate::parse_from_str(s, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    })
}

/// Returns the parsed column and how many present values failed to parse
fn parse_timestamps(cells: &[Option<String>], formats: &[String]) -> (TimestampColumn, usize) {
    let mut failures = 0;
    let values = cells
        .iter()
        .map(|cell| {
            let s = cell.as_deref()?;
            let parsed = parse_timestamp(s, formats);
            if parsed.is_none() {
                failures += 1;
            }
            parsed
        })
        .collect();
    (TimestampColumn::from_options(values), failures)
}

fn derive_year_hour(ts: &TimestampColumn) -> (Int64Column, Int64Column) {
    let years = ts.iter().map(|v| v.map(|t| t.year() as i64)).collect();
    let hours = ts.iter().map(|v| v.map(|t| t.hour() as i64)).collect();
    (Int64Column::from_options(years), Int64Column::from_options(hours))
}
