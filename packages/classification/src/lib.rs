#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone risk classification engine.
//!
//! Given a validated [`ZoneCatalog`] and a set of incidents, the engine
//! attributes each incident to every zone whose centroid lies within
//! [`ATTRIBUTION_RADIUS_KM`], scores each zone with the formula in
//! [`scoring`], assigns a [`RiskLevel`] and attaches that level's
//! recommendations.
//!
//! The engine holds only immutable configuration. Every call recomputes
//! its results from scratch, so one engine can be shared freely across
//! threads.

pub mod scoring;

use std::num::NonZeroU64;

use accident_zones_accident_models::{DataError, IncidentRecord};
use accident_zones_catalog::ZoneCatalog;
use accident_zones_spatial::{
    Coordinate, DistanceFunction, DistanceMetric, PointIndex, scan_within,
};
use accident_zones_zone_models::{RiskLevel, ZoneDefinition, ZoneResult};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// An incident belongs to a zone when it is strictly closer than this to
/// the zone centroid, as measured by the engine's distance function.
pub const ATTRIBUTION_RADIUS_KM: f64 = 2.0;

/// Errors that can occur during classification.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    /// An incident failed validation.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// A zone population cannot be used as a divisor.
    #[error("Zone '{zone_id}' has non-positive population {population}")]
    InvalidPopulation {
        /// Zone id.
        zone_id: String,
        /// Rejected population.
        population: i64,
    },
}

/// How incidents are matched to zones.
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
pub enum AttributionStrategy {
    /// Test every incident against every zone.
    #[serde(rename = "scan")]
    #[strum(serialize = "scan")]
    Scan,
    /// Prefilter candidates with an R-tree, then apply the exact test.
    #[default]
    #[serde(rename = "rtree")]
    #[strum(serialize = "rtree")]
    RTree,
}

/// Engine options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Distance metric for attribution.
    pub distance: DistanceMetric,
    /// Candidate search strategy.
    pub attribution: AttributionStrategy,
}

/// The incidents attributed to one zone.
#[derive(Debug, Clone)]
pub struct ZoneAttribution<'a> {
    /// The zone.
    pub zone: &'a ZoneDefinition,
    /// Attributed incidents, in input order.
    pub incidents: Vec<&'a IncidentRecord>,
}

/// Classifies incidents into the zones of a fixed catalog.
pub struct ZoneRiskEngine {
    catalog: ZoneCatalog,
    distance: Box<dyn DistanceFunction>,
    attribution: AttributionStrategy,
}

impl ZoneRiskEngine {
    /// Creates an engine with the default planar distance and R-tree
    /// attribution.
    #[must_use]
    pub fn new(catalog: ZoneCatalog) -> Self {
        Self::with_config(catalog, EngineConfig::default())
    }

    /// Creates an engine from explicit options.
    #[must_use]
    pub fn with_config(catalog: ZoneCatalog, config: EngineConfig) -> Self {
        Self {
            catalog,
            distance: config.distance.function(),
            attribution: config.attribution,
        }
    }

    /// Replaces the distance function, e.g. with a custom geodesic.
    #[must_use]
    pub fn with_distance_function(mut self, distance: Box<dyn DistanceFunction>) -> Self {
        self.distance = distance;
        self
    }

    /// Replaces the attribution strategy.
    #[must_use]
    pub const fn with_attribution(mut self, attribution: AttributionStrategy) -> Self {
        self.attribution = attribution;
        self
    }

    /// The catalog this engine reports on.
    #[must_use]
    pub const fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    /// Finds, for every zone in catalog order, the incidents attributed to
    /// it. An incident may appear under several zones, or none.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError::Data`] if any incident has a blank id
    /// or an invalid coordinate. Nothing is attributed in that case.
    pub fn attribute<'a>(
        &'a self,
        incidents: &'a [IncidentRecord],
    ) -> Result<Vec<ZoneAttribution<'a>>, ClassificationError> {
        for incident in incidents {
            incident.validate()?;
        }

        let points: Vec<Coordinate> = incidents
            .iter()
            .map(|i| Coordinate::new(i.latitude, i.longitude))
            .collect();

        let index = match self.attribution {
            AttributionStrategy::RTree => Some(PointIndex::build(&points)),
            AttributionStrategy::Scan => None,
        };

        let attributions = self
            .catalog
            .zones()
            .iter()
            .map(|zone| {
                let center = Coordinate::new(zone.latitude, zone.longitude);
                let positions = index.as_ref().map_or_else(
                    || scan_within(&points, center, ATTRIBUTION_RADIUS_KM, self.distance.as_ref()),
                    |index| index.within(center, ATTRIBUTION_RADIUS_KM, self.distance.as_ref()),
                );

                ZoneAttribution {
                    zone,
                    incidents: positions.into_iter().map(|p| &incidents[p]).collect(),
                }
            })
            .collect();

        Ok(attributions)
    }

    /// Classifies every zone in the catalog against `incidents`.
    ///
    /// Returns one [`ZoneResult`] per catalog zone, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError`] if any incident is invalid. No
    /// partial results are produced.
    pub fn classify(
        &self,
        incidents: &[IncidentRecord],
    ) -> Result<Vec<ZoneResult>, ClassificationError> {
        let attributions = self.attribute(incidents)?;

        let results = attributions
            .into_iter()
            .map(|attribution| self.score_zone(&attribution))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "Classified {} zones from {} incidents ({} distance, {} attribution)",
            results.len(),
            incidents.len(),
            self.distance.name(),
            self.attribution
        );

        Ok(results)
    }

    fn score_zone(&self, attribution: &ZoneAttribution<'_>) -> Result<ZoneResult, ClassificationError> {
        let zone = attribution.zone;
        let population = u64::try_from(zone.population)
            .ok()
            .and_then(NonZeroU64::new)
            .ok_or_else(|| ClassificationError::InvalidPopulation {
                zone_id: zone.id.clone(),
                population: zone.population,
            })?;

        let accident_count = attribution.incidents.len() as u64;
        let severity_sum = scoring::severity_sum(attribution.incidents.iter().map(|i| i.severity));
        let risk_score = scoring::risk_score(accident_count, severity_sum, population);
        let risk_level: RiskLevel = scoring::classify(accident_count, risk_score);

        log::debug!(
            "Zone {} ({}): {accident_count} accidents, severity sum {severity_sum}, \
             score {risk_score} -> {risk_level}",
            zone.id,
            zone.name,
        );

        Ok(ZoneResult::new(
            zone.clone(),
            accident_count,
            risk_score,
            risk_level,
        ))
    }
}
