//! Descriptive statistics module

use crate::stats::DescriptiveStats;

/// Internal implementation for calculating descriptive statistics.
///
/// NaN inputs are ignored. With no data every statistic except `count` is
/// NaN; with a single value `std` is NaN (the N-1 denominator is zero).
pub(crate) fn describe_impl(data: &[f64]) -> DescriptiveStats {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|v| !v.is_nan()).collect();
    let count = sorted.len();

    if count == 0 {
        return DescriptiveStats {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        };
    }

    // Calculate mean
    let mean = sorted.iter().sum::<f64>() / count as f64;

    // Sample standard deviation (unbiased estimator)
    let std = if count > 1 {
        let sum_squared_diff = sorted.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
        (sum_squared_diff / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    sorted.sort_by(|a, b| a.total_cmp(b));

    DescriptiveStats {
        count,
        mean,
        std,
        min: sorted[0],
        q1: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.50),
        q3: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Percentile of sorted data by linear interpolation between the two
/// bracketing ranks. `p` is a fraction in `[0, 1]`.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return f64::NAN;
    }

    let n = sorted_data.len();
    let idx = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let idx_floor = idx.floor() as usize;
    let idx_ceil = idx.ceil() as usize;

    if idx_floor == idx_ceil {
        return sorted_data[idx_floor];
    }

    let weight_ceil = idx - idx_floor as f64;
    let weight_floor = 1.0 - weight_ceil;

    sorted_data[idx_floor] * weight_floor + sorted_data[idx_ceil] * weight_ceil
}
