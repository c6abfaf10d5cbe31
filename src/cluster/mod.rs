//! Grid-based marker clustering
//!
//! Points are hashed into square grid cells whose size follows the zoom level
//! of the visible region. Each populated cell becomes one marker: a single
//! point passes through unchanged, a crowded cell collapses into a cluster
//! centered on the mean of its members.
//!
//! Markers are recomputed from scratch for every (points, region) pair.

use crate::config::defaults::{
    DEFAULT_BASE_CELL_DEGREES, DEFAULT_MAX_CLUSTERED_ZOOM, DEFAULT_REFERENCE_ZOOM,
};
use crate::constants::geo::{MAX_ZOOM, WORLD_DEGREES};
use crate::coord::distance::centroid;
use crate::coord::{Coordinate, PointOfInterest, Region};
use serde::Serialize;
use std::collections::HashMap;

/// A marker ready to be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMarker<P> {
    /// Member id for single markers, grid cell id for clusters
    pub id: String,
    /// Member coordinate, or the mean of all member coordinates
    pub center: Coordinate,
    pub members: Vec<P>,
    pub count: usize,
}

impl<P> ClusterMarker<P> {
    /// Whether this marker stands for a single point
    pub fn is_single(&self) -> bool {
        self.count == 1
    }
}

impl<P: PointOfInterest> ClusterMarker<P> {
    fn single(point: P) -> Self {
        Self {
            id: point.id().to_string(),
            center: point.coordinate(),
            members: vec![point],
            count: 1,
        }
    }

    fn from_cell(key: (i64, i64), mut members: Vec<P>) -> Self {
        if members.len() == 1 {
            if let Some(point) = members.pop() {
                return Self::single(point);
            }
        }

        let center = centroid(members.iter().map(|p| p.coordinate())).unwrap_or_default();
        Self {
            id: format!("cluster_{}_{}", key.0, key.1),
            center,
            count: members.len(),
            members,
        }
    }
}

/// Tunables for the clustering grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSettings {
    /// Zoom level above which every point gets its own marker
    pub max_clustered_zoom: i32,
    /// Cell size at `reference_zoom`, in degrees
    pub base_cell_degrees: f64,
    /// Zoom level at which cells are `base_cell_degrees` wide
    pub reference_zoom: i32,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            max_clustered_zoom: DEFAULT_MAX_CLUSTERED_ZOOM,
            base_cell_degrees: DEFAULT_BASE_CELL_DEGREES,
            reference_zoom: DEFAULT_REFERENCE_ZOOM,
        }
    }
}

impl ClusterSettings {
    /// Grid cell size in degrees for a zoom level
    ///
    /// Cells halve with every zoom level above the reference level and
    /// double below it.
    pub fn grid_size(&self, zoom: i32) -> f64 {
        self.base_cell_degrees * 2f64.powi(self.reference_zoom - zoom)
    }

    /// Whether points are grouped at this zoom level
    pub fn clusters_at(&self, zoom: i32) -> bool {
        zoom <= self.max_clustered_zoom
    }
}

/// Integer zoom level for a latitude span
///
/// `round(log2(360 / lat_delta))`; larger means more zoomed in.
pub fn zoom_for_delta(lat_delta: f64) -> i32 {
    if !(lat_delta.is_finite() && lat_delta > 0.0) {
        return MAX_ZOOM;
    }
    (WORLD_DEGREES / lat_delta).log2().round() as i32
}

/// Group pre-validated points into markers for the given region
///
/// The sum of `count` over the result always equals `points.len()`. Output
/// order carries no meaning.
pub fn cluster_points<P>(
    points: &[P],
    region: &Region,
    settings: &ClusterSettings,
) -> Vec<ClusterMarker<P>>
where
    P: PointOfInterest + Clone,
{
    let zoom = zoom_for_delta(region.lat_delta);

    if !settings.clusters_at(zoom) {
        return points.iter().cloned().map(ClusterMarker::single).collect();
    }

    let grid = settings.grid_size(zoom);

    // Cells are kept in first-seen order so repeated runs agree
    let mut slots: HashMap<(i64, i64), usize> = HashMap::new();
    let mut cells: Vec<((i64, i64), Vec<P>)> = Vec::new();

    for point in points {
        let coord = point.coordinate();
        let key = (
            (coord.lat / grid).floor() as i64,
            (coord.lng / grid).floor() as i64,
        );

        let slot = *slots.entry(key).or_insert_with(|| {
            cells.push((key, Vec::new()));
            cells.len() - 1
        });
        cells[slot].1.push(point.clone());
    }

    cells
        .into_iter()
        .map(|(key, members)| ClusterMarker::from_cell(key, members))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branches::Branch;
    use approx::assert_abs_diff_eq;

    fn region(lat_delta: f64) -> Region {
        Region::around(Coordinate::new(14.6, 121.0), lat_delta)
    }

    fn total(markers: &[ClusterMarker<Branch>]) -> usize {
        markers.iter().map(|m| m.count).sum()
    }

    /// Deterministic scatter of points over metro Manila
    fn scatter(n: usize) -> Vec<Branch> {
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        (0..n)
            .map(|i| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let a = (state >> 11) as f64 / (1u64 << 53) as f64;
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let b = (state >> 11) as f64 / (1u64 << 53) as f64;
                Branch::new(format!("b{}", i), 14.3 + a * 0.6, 120.8 + b * 0.5)
            })
            .collect()
    }

    /// Two groups of ten, each well inside a single zoom-10 cell
    fn two_groups() -> (Vec<Branch>, Coordinate, Coordinate) {
        let centers = [Coordinate::new(14.5625, 121.0125), Coordinate::new(14.6625, 121.1125)];
        let mut points = Vec::new();
        for (g, center) in centers.iter().enumerate() {
            for i in 0..10 {
                let offset = (i as f64 - 4.5) * 0.001;
                points.push(Branch::new(
                    format!("g{}-{}", g, i),
                    center.lat + offset,
                    center.lng - offset,
                ));
            }
        }
        (points, centers[0], centers[1])
    }

    #[test]
    fn test_zoom_for_delta() {
        assert_eq!(zoom_for_delta(360.0), 0);
        assert_eq!(zoom_for_delta(0.3), 10);
        assert_eq!(zoom_for_delta(0.05), 13);
        assert_eq!(zoom_for_delta(0.02), 14);
        assert_eq!(zoom_for_delta(0.01), 15);
        assert_eq!(zoom_for_delta(0.0), MAX_ZOOM);
        assert_eq!(zoom_for_delta(-1.0), MAX_ZOOM);
        assert_eq!(zoom_for_delta(f64::NAN), MAX_ZOOM);
    }

    #[test]
    fn test_grid_size() {
        let settings = ClusterSettings::default();
        assert_abs_diff_eq!(settings.grid_size(8), 0.2);
        assert_abs_diff_eq!(settings.grid_size(10), 0.05);
        assert_abs_diff_eq!(settings.grid_size(7), 0.4);
    }

    #[test]
    fn test_empty_input() {
        let points: Vec<Branch> = Vec::new();
        assert!(cluster_points(&points, &region(0.3), &ClusterSettings::default()).is_empty());
    }

    #[test]
    fn test_two_group_scenario() {
        let (points, first, second) = two_groups();
        let markers = cluster_points(&points, &region(0.3), &ClusterSettings::default());

        assert_eq!(markers.len(), 2);
        for marker in &markers {
            assert_eq!(marker.count, 10);
            assert_eq!(marker.members.len(), 10);
            assert!(!marker.is_single());
        }

        let mut centers: Vec<Coordinate> = markers.iter().map(|m| m.center).collect();
        centers.sort_by(|a, b| a.lat.total_cmp(&b.lat));
        assert_abs_diff_eq!(centers[0].lat, first.lat, epsilon = 1e-9);
        assert_abs_diff_eq!(centers[0].lng, first.lng, epsilon = 1e-9);
        assert_abs_diff_eq!(centers[1].lat, second.lat, epsilon = 1e-9);
        assert_abs_diff_eq!(centers[1].lng, second.lng, epsilon = 1e-9);
    }

    #[test]
    fn test_totality() {
        let points = scatter(200);
        let settings = ClusterSettings::default();
        for delta in [90.0, 5.0, 1.0, 0.3, 0.08, 0.02, 0.004] {
            let markers = cluster_points(&points, &region(delta), &settings);
            assert_eq!(total(&markers), points.len(), "delta {}", delta);
        }
    }

    #[test]
    fn test_zoom_monotonicity() {
        let points = scatter(300);
        let settings = ClusterSettings::default();
        let deltas = [180.0, 45.0, 10.0, 2.5, 0.6, 0.15, 0.04, 0.01, 0.0025];

        let counts: Vec<usize> = deltas
            .iter()
            .map(|d| cluster_points(&points, &region(*d), &settings).len())
            .collect();

        for pair in counts.windows(2) {
            assert!(pair[0] <= pair[1], "marker counts not monotonic: {:?}", counts);
        }
    }

    #[test]
    fn test_no_clustering_when_zoomed_in() {
        let (points, _, _) = two_groups();
        let markers = cluster_points(&points, &region(0.01), &ClusterSettings::default());

        assert_eq!(markers.len(), points.len());
        assert!(markers.iter().all(|m| m.count == 1));
        assert!(markers.iter().zip(&points).all(|(m, p)| m.id == p.id));
    }

    #[test]
    fn test_single_marker_reuses_point_id() {
        let points = vec![Branch::new("lonely", 10.3157, 123.8854), Branch::new("far", 14.6, 121.0)];
        let markers = cluster_points(&points, &region(0.3), &ClusterSettings::default());

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].id, "lonely");
        assert_eq!(markers[0].center, points[0].coordinate());
        assert!(markers[0].is_single());
    }

    #[test]
    fn test_boundary_resolves_by_floor() {
        // Quarter-degree cells at zoom 8 keep the boundary exactly representable
        let settings = ClusterSettings {
            base_cell_degrees: 0.25,
            ..ClusterSettings::default()
        };
        let zoom8 = Region::around(Coordinate::new(14.5, 121.0), 360.0 / 256.0);
        let points = vec![
            Branch::new("on-edge", 14.5, 121.1),
            Branch::new("inside", 14.7, 121.1),
            Branch::new("below", 14.49, 121.1),
        ];

        let markers = cluster_points(&points, &zoom8, &settings);
        assert_eq!(markers.len(), 2);

        let cluster = markers.iter().find(|m| m.count == 2).unwrap();
        assert_eq!(cluster.id, "cluster_58_484");
        let ids: Vec<&str> = cluster.members.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["on-edge", "inside"]);
    }

    #[test]
    fn test_deterministic() {
        let points = scatter(100);
        let settings = ClusterSettings::default();
        let a = cluster_points(&points, &region(0.6), &settings);
        let b = cluster_points(&points, &region(0.6), &settings);
        assert_eq!(a, b);
    }
}
