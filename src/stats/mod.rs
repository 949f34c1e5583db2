//! Statistics module
//!
//! Summary statistics over the non-null values of numeric columns.

pub mod descriptive;

use serde::Serialize;

pub use descriptive::percentile;

/// Structure holding descriptive statistics results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// Number of non-null data points
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Standard deviation (unbiased estimator)
    pub std: f64,
    /// Minimum value
    pub min: f64,
    /// 25% quantile
    #[serde(rename = "25%")]
    pub q1: f64,
    /// Median (50% quantile)
    #[serde(rename = "50%")]
    pub median: f64,
    /// 75% quantile
    #[serde(rename = "75%")]
    pub q3: f64,
    /// Maximum value
    pub max: f64,
}

/// Calculate descriptive statistics; never fails, empty input yields NaN
pub fn describe(data: &[f64]) -> DescriptiveStats {
    descriptive::describe_impl(data)
}
