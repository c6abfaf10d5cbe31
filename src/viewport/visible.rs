//! Nearest-subset selection for rendering

use crate::coord::distance::distance_km;
use crate::coord::validate::filter_valid;
use crate::coord::{PointOfInterest, Region};

/// The valid points worth drawing for a viewport
///
/// With `max_visible` or fewer valid points all of them are returned in input
/// order. Otherwise the `max_visible` points nearest to the viewport center
/// are returned, nearest first, ties keeping their input order.
pub fn visible_points<P>(points: &[P], viewport: &Region, max_visible: usize) -> Vec<P>
where
    P: PointOfInterest + Clone,
{
    let valid = filter_valid(points);
    if valid.len() <= max_visible {
        return valid;
    }

    let mut ranked: Vec<(f64, P)> = valid
        .into_iter()
        .map(|p| (distance_km(viewport.center, p.coordinate()), p))
        .collect();
    // Stable sort keeps input order among equal distances
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.truncate(max_visible);

    ranked.into_iter().map(|(_, p)| p).collect()
}
