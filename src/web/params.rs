//! Query-string validation
//!
//! Raw parameters are checked here and turned into the scalar types the
//! query engine takes, so malformed input never reaches it.

use std::collections::HashMap;

use crate::core::error::{Error, Result};

/// Decoded query-string parameters
pub type Params = HashMap<String, String>;

/// Value of a parameter that must be present and non-empty
pub fn required<'a>(params: &'a Params, name: &str) -> Result<&'a str> {
    optional(params, name)
        .ok_or_else(|| Error::InvalidArgument(format!("missing required parameter '{}'", name)))
}

/// Value of a parameter if present and non-empty
pub fn optional<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Integer parameter
pub fn parse_int(name: &str, raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        Error::InvalidArgument(format!("parameter '{}' must be an integer, got '{}'", name, raw))
    })
}

/// Row count for `/head`: a non-negative integer, `default` when absent
pub fn parse_count(raw: Option<&str>, default: usize) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(default as i64);
    };
    let count = parse_int("count", raw)?;
    if count < 0 {
        return Err(Error::InvalidArgument(format!(
            "parameter 'count' must be a non-negative integer, got {}",
            count
        )));
    }
    Ok(count)
}

/// Hour of the day, 0 through 23
pub fn parse_hour(name: &str, raw: &str) -> Result<i64> {
    let hour = parse_int(name, raw)?;
    if !(0..=23).contains(&hour) {
        return Err(Error::InvalidArgument(format!(
            "parameter '{}' must be an hour between 0 and 23, got {}",
            name, hour
        )));
    }
    Ok(hour)
}

fn parse_float(name: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            Error::InvalidArgument(format!("parameter '{}' must be a number, got '{}'", name, raw))
        })
}

/// Latitude in degrees, -90 through 90
pub fn parse_latitude(raw: &str) -> Result<f64> {
    let lat = parse_float("lat", raw)?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::InvalidArgument(format!(
            "parameter 'lat' must be between -90 and 90, got {}",
            lat
        )));
    }
    Ok(lat)
}

/// Longitude in degrees, -180 through 180
pub fn parse_longitude(raw: &str) -> Result<f64> {
    let lon = parse_float("lon", raw)?;
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::InvalidArgument(format!(
            "parameter 'lon' must be between -180 and 180, got {}",
            lon
        )));
    }
    Ok(lon)
}

/// Search radius in kilometers, `default` when absent
pub fn parse_radius(raw: Option<&str>, default: f64) -> Result<f64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let radius = parse_float("radius", raw)?;
    if radius < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "parameter 'radius' must not be negative, got {}",
            radius
        )));
    }
    Ok(radius)
}

/// Boolean switch; absent means false
pub fn parse_flag(name: &str, raw: Option<&str>) -> Result<bool> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        None => Ok(false),
        Some("true") | Some("1") | Some("yes") => Ok(true),
        Some("false") | Some("0") | Some("no") => Ok(false),
        Some(other) => Err(Error::InvalidArgument(format!(
            "parameter '{}' must be true or false, got '{}'",
            name, other
        ))),
    }
}
