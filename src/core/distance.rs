use std::f64::consts::FRAC_PI_2;

use crate::models::{BoundingBox, GeoPoint};

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers. Non-finite inputs yield a non-finite distance.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two points in kilometers
#[inline]
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Calculate a bounding box around a center point
///
/// Used as a pre-filter ahead of the exact haversine radius check, so the box
/// must contain the whole spherical cap. For an angular radius `d` the cap's
/// widest longitude extent is `asin(sin(d) / cos(lat))`, which is reached
/// poleward of the center. When the cap covers a pole or would cross the
/// antimeridian the longitude span is left unbounded.
pub fn calculate_bounding_box(center: GeoPoint, radius_km: f64) -> BoundingBox {
    let angular = radius_km / EARTH_RADIUS_KM;
    let lat_delta = angular.to_degrees();
    let min_lat = center.latitude - lat_delta;
    let max_lat = center.latitude + lat_delta;

    let lon_ratio = angular.sin() / center.latitude.to_radians().cos();
    let caps_pole = !(angular < FRAC_PI_2 && min_lat > -90.0 && max_lat < 90.0 && lon_ratio < 1.0);

    let (min_lon, max_lon) = if caps_pole {
        (-180.0, 180.0)
    } else {
        let lon_delta = lon_ratio.asin().to_degrees();
        if center.longitude - lon_delta >= -180.0 && center.longitude + lon_delta <= 180.0 {
            (center.longitude - lon_delta, center.longitude + lon_delta)
        } else {
            (-180.0, 180.0)
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: GeoPoint, bbox: &BoundingBox) -> bool {
    point.latitude >= bbox.min_lat
        && point.latitude <= bbox.max_lat
        && point.longitude >= bbox.min_lon
        && point.longitude <= bbox.max_lon
}

/// Human readable distance: meters below 1 km, one decimal above
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round())
    } else {
        format!("{:.1} km", km)
    }
}
