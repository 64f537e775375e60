//! Pluggable distance metrics.

use geo::{Distance as _, Point};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::Coordinate;

/// Kilometers per degree of latitude used by [`PlanarApproximation`].
pub const KM_PER_DEGREE_LATITUDE: f64 = 111.0;

/// Kilometers per degree of longitude used by [`PlanarApproximation`].
///
/// Only accurate around 40° latitude, which is where the zone thresholds
/// were calibrated.
pub const KM_PER_DEGREE_LONGITUDE: f64 = 85.0;

/// Mean earth radius in kilometers, matching `geo`'s haversine radius.
const EARTH_RADIUS_KM: f64 = 6_371.008_8;

/// Relative slack added to search extents so float rounding in the
/// prefilter can never drop a point the exact test would accept.
const EXTENT_SLACK: f64 = 1e-9;

/// A distance metric between two coordinates.
///
/// Implementations must be pure. `search_extent` must describe a box that
/// contains every point closer than `radius_km` to `origin`; the spatial
/// index relies on it never being too small.
pub trait DistanceFunction: Send + Sync {
    /// Short identifier used in logs (e.g. `"planar"`).
    fn name(&self) -> &'static str;

    /// Distance between two coordinates in kilometers.
    fn distance_km(&self, from: Coordinate, to: Coordinate) -> f64;

    /// Half-extents `(latitude_degrees, longitude_degrees)` of a box
    /// centered on `origin` that contains every coordinate closer than
    /// `radius_km`.
    fn search_extent(&self, origin: Coordinate, radius_km: f64) -> (f64, f64);
}

/// Flat-earth distance with fixed degree-to-kilometer scale factors.
///
/// Converts the latitude delta at 111 km/° and the longitude delta at
/// 85 km/°, then takes the Euclidean norm. This is not a geodesic; it is
/// the approximation the tier thresholds depend on.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarApproximation;

impl DistanceFunction for PlanarApproximation {
    fn name(&self) -> &'static str {
        "planar"
    }

    fn distance_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        let dy = (to.latitude - from.latitude) * KM_PER_DEGREE_LATITUDE;
        let dx = (to.longitude - from.longitude) * KM_PER_DEGREE_LONGITUDE;
        dx.hypot(dy)
    }

    fn search_extent(&self, _origin: Coordinate, radius_km: f64) -> (f64, f64) {
        let scale = 1.0 + EXTENT_SLACK;
        (
            radius_km / KM_PER_DEGREE_LATITUDE * scale,
            radius_km / KM_PER_DEGREE_LONGITUDE * scale,
        )
    }
}

/// Great-circle distance on a spherical earth, computed by `geo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceFunction for Haversine {
    fn name(&self) -> &'static str {
        "haversine"
    }

    fn distance_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        let a = Point::new(from.longitude, from.latitude);
        let b = Point::new(to.longitude, to.latitude);
        geo::Haversine.distance(a, b) / 1000.0
    }

    fn search_extent(&self, origin: Coordinate, radius_km: f64) -> (f64, f64) {
        let km_per_degree = EARTH_RADIUS_KM.to_radians();
        let lat_extent = radius_km / km_per_degree * 1.01;

        // Widest longitude span occurs at the box edge nearest the pole.
        let poleward = (origin.latitude.abs() + lat_extent).min(90.0);
        let cos = poleward.to_radians().cos();
        let lng_extent = if cos <= f64::EPSILON {
            180.0
        } else {
            (radius_km / (km_per_degree * cos) * 1.01).min(180.0)
        };

        (lat_extent, lng_extent)
    }
}

/// Named distance metrics selectable from configuration.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DistanceMetric {
    /// [`PlanarApproximation`]
    #[default]
    Planar,
    /// [`Haversine`]
    Haversine,
}

impl DistanceMetric {
    /// Creates the distance function for this metric.
    #[must_use]
    pub fn function(self) -> Box<dyn DistanceFunction> {
        match self {
            Self::Planar => Box::new(PlanarApproximation),
            Self::Haversine => Box::new(Haversine),
        }
    }
}
