//! Great-circle distance and centroids

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::coord::Coordinate;

/// Calculate the distance between two points in kilometres (Haversine formula)
///
/// # Arguments
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
/// Distance in kilometres, never negative
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().atan2((1.0 - h).max(0.0).sqrt());

    EARTH_RADIUS_KM * c
}

/// Arithmetic mean of a set of coordinates
///
/// Returns `None` for an empty set.
pub fn centroid<I>(coords: I) -> Option<Coordinate>
where
    I: IntoIterator<Item = Coordinate>,
{
    let (count, lat_sum, lng_sum) = coords
        .into_iter()
        .fold((0usize, 0.0, 0.0), |(n, lat, lng), c| (n + 1, lat + c.lat, lng + c.lng));

    if count == 0 {
        return None;
    }

    Some(Coordinate::new(lat_sum / count as f64, lng_sum / count as f64))
}
