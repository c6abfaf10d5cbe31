//! Filtering of raw point collections

use crate::coord::PointOfInterest;
use tracing::debug;

/// Keep only points whose coordinate can be placed on the map
///
/// Order is preserved and applying the filter twice changes nothing.
/// Malformed points are dropped silently rather than reported as errors.
pub fn filter_valid<P>(points: &[P]) -> Vec<P>
where
    P: PointOfInterest + Clone,
{
    let valid: Vec<P> = points
        .iter()
        .filter(|p| p.coordinate().is_valid())
        .cloned()
        .collect();

    let dropped = points.len() - valid.len();
    if dropped > 0 {
        debug!(dropped, kept = valid.len(), "Dropped points with unusable coordinates");
    }

    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branches::Branch;

    fn sample() -> Vec<Branch> {
        vec![
            Branch::new("a", 14.55, 121.02),
            Branch::new("unset", 0.0, 0.0),
            Branch::new("b", 14.60, 120.98),
            Branch::new("nan", f64::NAN, 121.0),
            Branch::new("c", 10.31, 123.89),
            Branch::new("lat", 95.0, 121.0),
            Branch::new("lng", 14.0, 181.0),
        ]
    }

    #[test]
    fn test_filter_keeps_valid_in_order() {
        let ids: Vec<String> = filter_valid(&sample()).into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_filter_idempotent() {
        let once = filter_valid(&sample());
        let twice = filter_valid(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_empty() {
        let empty: Vec<Branch> = Vec::new();
        assert!(filter_valid(&empty).is_empty());
    }
}
