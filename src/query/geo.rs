//! Great-circle distance helpers

use crate::core::error::{Error, Result};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in degrees
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Checks a query point is a finite latitude/longitude pair
pub fn validate_point(lat: f64, lon: f64) -> Result<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(Error::InvalidArgument(format!(
            "latitude must be between -90 and 90, got {}",
            lat
        )));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(Error::InvalidArgument(format!(
            "longitude must be between -180 and 180, got {}",
            lon
        )));
    }
    Ok(())
}

/// Checks a search radius is finite and non-negative
pub fn validate_radius(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "radius must be a non-negative number of kilometers, got {}",
            radius_km
        )));
    }
    Ok(())
}
