//! R-tree point index with an exact distance filter.

use rstar::{AABB, RTree, RTreeObject};

use crate::{Coordinate, DistanceFunction};

/// A point stored in the R-tree with its position in the input slice.
struct IndexedPoint {
    position: usize,
    coordinate: Coordinate,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coordinate.as_xy())
    }
}

/// Spatial index over a fixed set of points.
///
/// Built once per classification pass and queried once per zone.
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Bulk-loads an R-tree over `points`. Query results refer to
    /// positions in this slice.
    #[must_use]
    pub fn build(points: &[Coordinate]) -> Self {
        let entries: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(position, &coordinate)| IndexedPoint {
                position,
                coordinate,
            })
            .collect();

        let tree = RTree::bulk_load(entries);
        log::debug!("Indexed {} points", tree.size());

        Self { tree }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Positions of all points strictly closer than `radius_km` to
    /// `center`, in ascending order.
    ///
    /// Candidates come from the box given by
    /// [`DistanceFunction::search_extent`]; each is then checked with the
    /// exact distance, so the result equals [`scan_within`] on the same
    /// points.
    #[must_use]
    pub fn within(
        &self,
        center: Coordinate,
        radius_km: f64,
        distance: &dyn DistanceFunction,
    ) -> Vec<usize> {
        let (lat_extent, lng_extent) = distance.search_extent(center, radius_km);
        let south = center.latitude - lat_extent;
        let north = center.latitude + lat_extent;

        let mut matches = Vec::new();
        for (west, east) in longitude_ranges(center.longitude, lng_extent) {
            let query_env = AABB::from_corners([west, south], [east, north]);
            matches.extend(
                self.tree
                    .locate_in_envelope(&query_env)
                    .filter(|entry| distance.distance_km(center, entry.coordinate) < radius_km)
                    .map(|entry| entry.position),
            );
        }

        matches.sort_unstable();
        matches.dedup();
        matches
    }
}

/// Splits `longitude ± extent` into ranges inside `[-180, 180]`, wrapping
/// across the antimeridian. An extent of 180° or more covers every
/// longitude.
fn longitude_ranges(longitude: f64, extent: f64) -> Vec<(f64, f64)> {
    if extent >= 180.0 {
        return vec![(-180.0, 180.0)];
    }

    let west = longitude - extent;
    let east = longitude + extent;

    if west < -180.0 {
        vec![(west + 360.0, 180.0), (-180.0, east)]
    } else if east > 180.0 {
        vec![(west, 180.0), (-180.0, east - 360.0)]
    } else {
        vec![(west, east)]
    }
}

/// Positions of all `points` strictly closer than `radius_km` to `center`,
/// found by testing every point.
#[must_use]
pub fn scan_within(
    points: &[Coordinate],
    center: Coordinate,
    radius_km: f64,
    distance: &dyn DistanceFunction,
) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| distance.distance_km(center, **point) < radius_km)
        .map(|(position, _)| position)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Haversine, PlanarApproximation};

    /// Deterministic spread of points around a center, denser near it.
    fn spread(center: Coordinate) -> Vec<Coordinate> {
        let mut points = Vec::new();
        for i in -30_i32..=30 {
            for j in -30_i32..=30 {
                let dlat = f64::from(i) * 0.0011 + f64::from(j % 7) * 0.00003;
                let dlng = f64::from(j) * 0.0013 - f64::from(i % 5) * 0.00004;
                points.push(Coordinate::new(
                    center.latitude + dlat,
                    center.longitude + dlng,
                ));
            }
        }
        points
    }

    #[test]
    fn index_matches_scan_for_planar() {
        let center = Coordinate::new(40.7128, -74.0060);
        let points = spread(center);
        let index = PointIndex::build(&points);

        for radius in [0.5, 1.0, 2.0, 3.5] {
            let indexed = index.within(center, radius, &PlanarApproximation);
            let scanned = scan_within(&points, center, radius, &PlanarApproximation);
            assert_eq!(indexed, scanned, "radius {radius}");
            assert!(!scanned.is_empty());
        }
    }

    #[test]
    fn index_matches_scan_for_haversine() {
        let center = Coordinate::new(40.7589, -73.9851);
        let points = spread(center);
        let index = PointIndex::build(&points);

        let indexed = index.within(center, 2.0, &Haversine);
        let scanned = scan_within(&points, center, 2.0, &Haversine);
        assert_eq!(indexed, scanned);
    }

    #[test]
    fn point_exactly_at_radius_is_excluded() {
        let center = Coordinate::new(0.0, 0.0);
        let on_edge = Coordinate::new(0.0, 2.0 / 85.0);
        let just_inside = Coordinate::new(0.0, 1.999 / 85.0);
        assert!((PlanarApproximation.distance_km(center, on_edge) - 2.0).abs() < f64::EPSILON);

        let points = [on_edge, just_inside];
        let index = PointIndex::build(&points);
        assert_eq!(index.within(center, 2.0, &PlanarApproximation), vec![1]);
        assert_eq!(
            scan_within(&points, center, 2.0, &PlanarApproximation),
            vec![1]
        );
    }

    #[test]
    fn index_matches_scan_across_antimeridian() {
        let points = [
            Coordinate::new(0.0, -179.995),
            Coordinate::new(0.0, 179.99),
            Coordinate::new(0.0, -179.9),
        ];
        let index = PointIndex::build(&points);

        for center in [Coordinate::new(0.0, 179.995), Coordinate::new(0.0, -179.999)] {
            let indexed = index.within(center, 2.0, &Haversine);
            let scanned = scan_within(&points, center, 2.0, &Haversine);
            assert_eq!(indexed, scanned);
            assert_eq!(scanned, vec![0, 1]);
        }
    }

    #[test]
    fn index_matches_scan_near_pole() {
        let center = Coordinate::new(89.995, 50.0);
        let points = [
            Coordinate::new(89.995, -170.0),
            Coordinate::new(89.99, 120.0),
            Coordinate::new(89.0, -170.0),
        ];
        let index = PointIndex::build(&points);

        let indexed = index.within(center, 2.0, &Haversine);
        let scanned = scan_within(&points, center, 2.0, &Haversine);
        assert_eq!(indexed, scanned);
        assert!(scanned.contains(&0));
        assert!(!scanned.contains(&2));
    }

    #[test]
    fn longitude_ranges_wrap() {
        assert_eq!(longitude_ranges(10.0, 1.0), vec![(9.0, 11.0)]);
        assert_eq!(longitude_ranges(0.0, 180.0), vec![(-180.0, 180.0)]);

        let east = longitude_ranges(179.5, 1.0);
        assert_eq!(east.len(), 2);
        assert!((east[0].0 - 178.5).abs() < 1e-9);
        assert!((east[1].1 - -179.5).abs() < 1e-9);

        let west = longitude_ranges(-179.5, 1.0);
        assert_eq!(west.len(), 2);
        assert!((west[0].0 - 179.5).abs() < 1e-9);
        assert!((west[1].1 - -178.5).abs() < 1e-9);
    }

    #[test]
    fn empty_index_returns_nothing() {
        let index = PointIndex::build(&[]);
        assert!(index.is_empty());
        assert!(
            index
                .within(Coordinate::new(0.0, 0.0), 2.0, &PlanarApproximation)
                .is_empty()
        );
    }
}
