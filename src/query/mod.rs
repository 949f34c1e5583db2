//! Query engine over an immutable [`Table`]
//!
//! Every operation borrows the table and returns a [`RowView`] (row indices,
//! never copied data) or a small aggregate. Per-request derived values such
//! as `Distance_km` and `rush_hour` are computed into the returned
//! structures and never written back into the table, so a single table can
//! be queried from many threads at once without locking.

pub mod geo;
pub mod predicate;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::column::Column;
use crate::core::data_value::Value;
use crate::core::error::{Error, Result};
use crate::io::csv::{HOUR_COLUMN, YEAR_COLUMN};
use crate::io::json::DerivedColumn;
use crate::stats::{self, DescriptiveStats};
use crate::table::{Table, TableSummary};

pub use geo::{haversine_km, EARTH_RADIUS_KM};
pub use predicate::{Predicate, RowTest};

/// Column holding the reported issue text
pub const ISSUE_COLUMN: &str = "Issue Reported";
pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";

/// Per-request column carrying the haversine distance to the query point
pub const DISTANCE_COLUMN: &str = "Distance_km";

/// Per-request column flagging rush-hour rows
pub const RUSH_HOUR_COLUMN: &str = "rush_hour";

/// Substring counted by [`QueryEngine::hazard_count_by_year`] by default
pub const DEFAULT_HAZARD_ISSUE: &str = "Traffic Hazard";

/// Default radius for proximity searches
pub const DEFAULT_RADIUS_KM: f64 = 1.0;

/// Inclusive hour windows treated as rush hour
pub const RUSH_HOUR_WINDOWS: [(i64, i64); 2] = [(7, 9), (16, 18)];

/// Whether an hour falls in a rush-hour window; a missing hour never does
pub fn is_rush_hour(hour: Option<i64>) -> bool {
    hour.map(|h| RUSH_HOUR_WINDOWS.iter().any(|&(lo, hi)| h >= lo && h <= hi))
        .unwrap_or(false)
}

/// Ordered row indices into a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowView {
    indices: Vec<usize>,
}

impl RowView {
    /// Every row of a table with `row_count` rows, in storage order
    pub fn all(row_count: usize) -> Self {
        Self {
            indices: (0..row_count).collect(),
        }
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Rows of `self` that also appear in `other`, in `self`'s order
    pub fn intersect(&self, other: &RowView) -> RowView {
        let keep: HashSet<usize> = other.iter().collect();
        RowView {
            indices: self.iter().filter(|row| keep.contains(row)).collect(),
        }
    }

    /// Rows of `self` passing `test`, order kept
    pub fn retain<F: Fn(usize) -> bool>(&self, test: F) -> RowView {
        RowView {
            indices: self.iter().filter(|&row| test(row)).collect(),
        }
    }
}

impl IntoIterator for RowView {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.into_iter()
    }
}

impl Table {
    /// Rows matching `predicate`, in storage order
    pub fn filter(&self, predicate: &Predicate) -> Result<RowView> {
        let test = predicate.bind(self)?;
        Ok(RowView::all(self.row_count()).retain(test))
    }
}

/// Statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    pub column: String,
    pub stats: DescriptiveStats,
}

/// Distinct values of a column
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueValues {
    pub column: String,
    pub values: Vec<Value>,
    pub count: usize,
}

/// Number of rows observed at one hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: i64,
    pub count: usize,
}

/// Rows within a radius, each paired with its distance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearbyRows {
    pub rows: RowView,
    pub distances_km: Vec<f64>,
}

impl NearbyRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distances as a derived `Distance_km` column aligned with `rows`
    pub fn distance_column(&self) -> DerivedColumn {
        DerivedColumn::new(
            DISTANCE_COLUMN,
            self.distances_km.iter().map(|&d| Some(Value::Float(d))).collect(),
        )
    }
}

/// Read-only query operations over a borrowed table
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'t> {
    table: &'t Table,
    issue_column: &'t str,
}

impl<'t> QueryEngine<'t> {
    pub fn new(table: &'t Table) -> Self {
        Self {
            table,
            issue_column: ISSUE_COLUMN,
        }
    }

    /// Use a different column for issue substring matching
    pub fn with_issue_column(mut self, column: &'t str) -> Self {
        self.issue_column = column;
        self
    }

    pub fn table(&self) -> &'t Table {
        self.table
    }

    /// Rows matching an arbitrary predicate
    pub fn filter(&self, predicate: &Predicate) -> Result<RowView> {
        self.table.filter(predicate)
    }

    /// First `n` rows in storage order
    pub fn head(&self, n: i64) -> Result<RowView> {
        if n < 0 {
            return Err(Error::InvalidArgument(format!(
                "row count must be a non-negative integer, got {}",
                n
            )));
        }
        let n = (n as u64).min(self.table.row_count() as u64) as usize;
        Ok(RowView::from_indices((0..n).collect()))
    }

    /// Schema with null counts for every column
    pub fn summary(&self) -> TableSummary {
        self.table.summary()
    }

    /// Descriptive statistics for every numeric column, in schema order
    pub fn describe(&self) -> Vec<ColumnDescription> {
        self.table
            .columns()
            .filter_map(|(name, col)| {
                col.numeric_values().map(|values| ColumnDescription {
                    column: name.to_string(),
                    stats: stats::describe(&values),
                })
            })
            .collect()
    }

    /// Distinct non-null values of `column` in first-occurrence order
    pub fn unique_values(&self, column: &str) -> Result<UniqueValues> {
        let values = self.table.column(column)?.unique();
        Ok(UniqueValues {
            column: column.to_string(),
            count: values.len(),
            values,
        })
    }

    /// Distinct years present, ascending
    pub fn years(&self) -> Result<Vec<i64>> {
        let year = self.derived(YEAR_COLUMN)?;
        let years: BTreeSet<i64> = (0..year.len()).filter_map(|row| year.i64_at(row)).collect();
        Ok(years.into_iter().collect())
    }

    /// Row counts per observed hour, ascending; absent hours are omitted
    pub fn hour_frequencies(&self) -> Result<Vec<HourCount>> {
        let hour = self.derived(HOUR_COLUMN)?;
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for h in (0..hour.len()).filter_map(|row| hour.i64_at(row)) {
            *counts.entry(h).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(hour, count)| HourCount { hour, count })
            .collect())
    }

    /// Rows whose hour lies in `[start, end]`.
    ///
    /// Both bounds must be hours of the day; `start > end` is not an error
    /// and simply matches nothing.
    pub fn filter_by_hour_range(&self, start: i64, end: i64) -> Result<RowView> {
        for (label, bound) in [("start", start), ("end", end)] {
            if !(0..=23).contains(&bound) {
                return Err(Error::InvalidArgument(format!(
                    "{} hour must be an integer between 0 and 23, got {}",
                    label, bound
                )));
            }
        }
        self.derived(HOUR_COLUMN)?;
        self.table
            .filter(&Predicate::between(HOUR_COLUMN, start as f64, end as f64))
    }

    /// Rows of `year` whose issue contains `issue_substring`, ignoring case
    pub fn hazards_by_year(&self, year: i64, issue_substring: &str) -> Result<RowView> {
        self.derived(YEAR_COLUMN)?;
        let predicate = Predicate::equals(YEAR_COLUMN, year)
            .and(Predicate::contains(self.issue_column, issue_substring));
        self.table.filter(&predicate)
    }

    /// Number of rows counted by [`Self::hazards_by_year`]
    pub fn hazard_count_by_year(&self, year: i64, issue_substring: &str) -> Result<usize> {
        Ok(self.hazards_by_year(year, issue_substring)?.len())
    }

    /// Rows whose hour falls in a rush-hour window
    pub fn rush_hour_filter(&self) -> Result<RowView> {
        self.derived(HOUR_COLUMN)?;
        self.table.filter(&rush_hour_predicate())
    }

    /// `rush_hour` flag for each row of `view`, computed for this request only
    pub fn rush_hour_flags(&self, view: &RowView) -> Result<DerivedColumn> {
        let hour = self.derived(HOUR_COLUMN)?;
        Ok(DerivedColumn::new(
            RUSH_HOUR_COLUMN,
            view.iter()
                .map(|row| Some(Value::Boolean(is_rush_hour(hour.i64_at(row)))))
                .collect(),
        ))
    }

    /// Rows within `radius_km` of `(lat, lon)` with their distances.
    ///
    /// Rows missing either coordinate are skipped.
    pub fn nearby(&self, lat: f64, lon: f64, radius_km: f64) -> Result<NearbyRows> {
        self.nearby_in(&RowView::all(self.table.row_count()), lat, lon, radius_km)
    }

    fn nearby_in(&self, view: &RowView, lat: f64, lon: f64, radius_km: f64) -> Result<NearbyRows> {
        geo::validate_point(lat, lon)?;
        geo::validate_radius(radius_km)?;
        let lat_col = self.coordinate(LATITUDE_COLUMN)?;
        let lon_col = self.coordinate(LONGITUDE_COLUMN)?;

        let within = Predicate::Within {
            lat_column: LATITUDE_COLUMN.to_string(),
            lon_column: LONGITUDE_COLUMN.to_string(),
            lat,
            lon,
            radius_km,
        }
        .bind(self.table)?;
        let rows = view.retain(within);

        // Matching rows always carry both coordinates
        let distances_km = rows
            .iter()
            .filter_map(|row| {
                let (row_lat, row_lon) = (lat_col.f64_at(row)?, lon_col.f64_at(row)?);
                Some(haversine_km(lat, lon, row_lat, row_lon))
            })
            .collect();
        let nearby = NearbyRows { rows, distances_km };

        log::debug!(
            "{} of {} rows within {} km of ({}, {})",
            nearby.len(),
            view.len(),
            radius_km,
            lat,
            lon
        );
        Ok(nearby)
    }

    /// Rows inside the coarse Austin sanity box: non-zero coordinates and
    /// latitude at most 35
    pub fn cleaned_geo(&self) -> Result<RowView> {
        self.coordinate(LATITUDE_COLUMN)?;
        self.coordinate(LONGITUDE_COLUMN)?;
        let predicate = Predicate::All(vec![
            Predicate::not_equals(LATITUDE_COLUMN, 0.0),
            Predicate::not_equals(LONGITUDE_COLUMN, 0.0),
            Predicate::at_most(LATITUDE_COLUMN, 35.0),
        ]);
        self.table.filter(&predicate)
    }

    /// Rush-hour rows of `year` within `radius_km` of `(lat, lon)`
    pub fn rush_hour_nearby(
        &self,
        lat: f64,
        lon: f64,
        year: i64,
        radius_km: f64,
    ) -> Result<NearbyRows> {
        let missing: Vec<&str> = [LATITUDE_COLUMN, LONGITUDE_COLUMN, HOUR_COLUMN, YEAR_COLUMN]
            .into_iter()
            .filter(|name| !self.table.contains_column(name))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Schema(format!(
                "required columns missing: {}",
                missing.join(", ")
            )));
        }

        let in_year_rush = self.table.filter(
            &Predicate::equals(YEAR_COLUMN, year).and(rush_hour_predicate()),
        )?;
        self.nearby_in(&in_year_rush, lat, lon, radius_km)
    }

    /// A derived column; its absence means the source lacked a timestamp
    fn derived(&self, name: &str) -> Result<&'t Column> {
        self.table.column(name).map_err(|_| {
            Error::ColumnUnavailable(format!(
                "{} was not derived because the timestamp column is absent",
                name
            ))
        })
    }

    fn coordinate(&self, name: &str) -> Result<&'t Column> {
        let col = self.table.column(name)?;
        if !col.dtype().is_numeric() {
            return Err(Error::Schema(format!(
                "column {} is {}, expected numeric coordinates",
                name,
                col.dtype()
            )));
        }
        Ok(col)
    }
}

fn rush_hour_predicate() -> Predicate {
    Predicate::Any(
        RUSH_HOUR_WINDOWS
            .iter()
            .map(|&(lo, hi)| Predicate::between(HOUR_COLUMN, lo as f64, hi as f64))
            .collect(),
    )
}
