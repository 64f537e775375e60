#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics types for a classification run.
//!
//! These are the shapes a dashboard renders next to the zone map: how many
//! zones landed in each tier, how incidents break down by category and by
//! time, and the zones ordered by urgency.

use accident_zones_zone_models::{RiskLevel, ZoneResult};
use serde::{Deserialize, Serialize};

/// Number of zones in each risk tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    /// Zones classified red.
    pub red: u64,
    /// Zones classified orange.
    pub orange: u64,
    /// Zones classified yellow.
    pub yellow: u64,
    /// Zones classified green.
    pub green: u64,
}

impl TierCounts {
    /// Adds one zone at `level`.
    pub const fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Red => self.red += 1,
            RiskLevel::Orange => self.orange += 1,
            RiskLevel::Yellow => self.yellow += 1,
            RiskLevel::Green => self.green += 1,
        }
    }

    /// Count for a single tier.
    #[must_use]
    pub const fn get(&self, level: RiskLevel) -> u64 {
        match level {
            RiskLevel::Red => self.red,
            RiskLevel::Orange => self.orange,
            RiskLevel::Yellow => self.yellow,
            RiskLevel::Green => self.green,
        }
    }

    /// Total zones across all tiers.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.red + self.orange + self.yellow + self.green
    }
}

/// Count of incidents in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category name (lowercase wire name).
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

/// A time-series data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Period label (e.g. "Jan").
    pub period: String,
    /// Incident count in this period.
    pub count: u64,
}

/// Everything the summary view shows for one classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Catalog the zones came from.
    pub catalog_id: String,
    /// Zones per tier.
    pub tiers: TierCounts,
    /// Share of zones that are green or yellow, as a rounded percentage.
    pub safe_zone_percentage: u64,
    /// Incidents in the input, attributed or not.
    pub total_incidents: u64,
    /// Sum of per-zone accident counts. Exceeds `total_incidents` when
    /// zones overlap.
    pub total_attributed: u64,
    /// Incidents per severity, in severity order.
    pub by_severity: Vec<CategoryCount>,
    /// Incidents per weather condition.
    pub by_weather: Vec<CategoryCount>,
    /// Incidents per road type.
    pub by_road_type: Vec<CategoryCount>,
    /// Incidents per calendar month, January first.
    pub by_month: Vec<TimeSeriesPoint>,
    /// Incidents per hour of day, midnight first.
    pub by_hour: Vec<TimeSeriesPoint>,
    /// Hour of day (0-23) with the most incidents.
    pub peak_hour: Option<u32>,
    /// Casualties summed over all incidents.
    pub total_casualties: u64,
    /// Incidents rated severe or fatal.
    pub serious_incidents: u64,
    /// Number of distinct location names.
    pub distinct_locations: u64,
    /// Zones ordered from most to least urgent tier.
    pub ranked_zones: Vec<ZoneResult>,
}
