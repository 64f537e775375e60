#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Distance functions and spatial indexing for zone attribution.
//!
//! Zone membership is decided by a [`DistanceFunction`]: an incident
//! belongs to a zone when its distance to the zone centroid is strictly
//! below the attribution radius. The default metric is the
//! [`PlanarApproximation`] the classification thresholds were tuned
//! against; [`Haversine`] is available for callers that want great-circle
//! distances instead.
//!
//! [`PointIndex`] builds an R-tree over incident coordinates so each zone
//! only tests the candidates inside a small search box. It returns exactly
//! the same matches as [`scan_within`], in the same order.

pub mod distance;
pub mod index;

pub use distance::{DistanceFunction, DistanceMetric, Haversine, PlanarApproximation};
pub use index::{PointIndex, scan_within};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// R-tree key, `[x, y]` = `[longitude, latitude]`.
    #[must_use]
    pub const fn as_xy(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}
