#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone definition and risk classification types.
//!
//! A zone is a fixed area of interest described by a centroid and a
//! population. Zones are configuration and never derived from incident
//! data. The risk engine turns each [`ZoneDefinition`] into a
//! [`ZoneResult`] carrying a [`RiskLevel`] and the recommendations for
//! that level.
//!
//! All per-level metadata (colors, recommendations, descriptions) lives in
//! constant tables indexed by [`RiskLevel::index`], so every lookup is a
//! total function over the enum.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Color returned by [`risk_color`] for values that are not a risk level.
pub const UNKNOWN_RISK_COLOR: &str = "#6b7280";

/// Risk tier assigned to a zone, ordered `Green < Yellow < Orange < Red`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    /// Few or no accidents.
    Green = 0,
    /// Some historical incidents.
    Yellow = 1,
    /// Moderate accident frequency.
    Orange = 2,
    /// High accident frequency or severity.
    Red = 3,
}

const COLORS: [&str; 4] = ["#16a34a", "#ca8a04", "#ea580c", "#dc2626"];

const RECOMMENDATIONS: [&[&str]; 4] = [
    &[
        "Maintain current safety measures",
        "Annual safety assessments",
    ],
    &[
        "Monitor traffic patterns",
        "Quarterly safety reviews",
        "Community awareness programs",
    ],
    &[
        "Add warning signs",
        "Improve road markings",
        "Install speed bumps",
        "Regular safety inspections",
    ],
    &[
        "Install additional traffic lights",
        "Increase police patrol frequency",
        "Add speed cameras",
        "Improve road lighting",
        "Install pedestrian barriers",
    ],
];

const DESCRIPTIONS: [&str; 4] = [
    "Minimal to no accidents recorded. Maintain current safety standards.",
    "Low accident frequency with some historical incidents. Periodic safety reviews recommended.",
    "Moderate accident frequency. Regular monitoring and preventive measures needed.",
    "High accident frequency with severe incidents. Immediate safety interventions required.",
];

const ACTIONS: [&str; 4] = [
    "Maintain Standards",
    "Regular Assessment",
    "Monitor and Improve",
    "Immediate Action Required",
];

const TIMELINES: [&str; 4] = [
    "Annual safety assessment recommended",
    "Review safety measures quarterly",
    "Implement improvements within 90 days",
    "Deploy safety measures within 30 days",
];

impl RiskLevel {
    /// Position of this level in the metadata tables (green = 0).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Severity rank, green = 1 through red = 4.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8 + 1
    }

    /// Display color as a hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        COLORS[self.index()]
    }

    /// Ordered safety recommendations for zones at this level.
    #[must_use]
    pub const fn recommendations(self) -> &'static [&'static str] {
        RECOMMENDATIONS[self.index()]
    }

    /// One-sentence explanation of what this level means.
    #[must_use]
    pub const fn description(self) -> &'static str {
        DESCRIPTIONS[self.index()]
    }

    /// Short heading for the action this level calls for.
    #[must_use]
    pub const fn action(self) -> &'static str {
        ACTIONS[self.index()]
    }

    /// Deadline guidance for acting on the recommendations.
    #[must_use]
    pub const fn timeline(self) -> &'static str {
        TIMELINES[self.index()]
    }

    /// Returns all variants, most severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Red, Self::Orange, Self::Yellow, Self::Green]
    }
}

/// Looks up the display color for any risk level name.
///
/// Accepts arbitrary strings so presentation code can pass through
/// whatever it holds; anything that is not exactly `red`, `orange`,
/// `yellow` or `green` yields [`UNKNOWN_RISK_COLOR`].
#[must_use]
pub fn risk_color(risk_level: &str) -> &'static str {
    risk_level
        .parse::<RiskLevel>()
        .map_or(UNKNOWN_RISK_COLOR, RiskLevel::color)
}

/// A zone of interest as configured in a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDefinition {
    /// Unique zone identifier (e.g. `"zone_1"`).
    pub id: String,
    /// Human-readable zone name.
    pub name: String,
    /// Centroid latitude (WGS84).
    pub latitude: f64,
    /// Centroid longitude (WGS84).
    pub longitude: f64,
    /// Resident population, used to normalize the risk score. Must be
    /// positive; catalogs reject anything else at load time.
    pub population: i64,
}

/// A zone after one classification pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneResult {
    /// The zone this result describes.
    #[serde(flatten)]
    pub zone: ZoneDefinition,
    /// Number of incidents attributed to the zone.
    pub accident_count: u64,
    /// Population-normalized, severity-weighted risk score.
    pub risk_score: u64,
    /// Assigned risk tier.
    pub risk_level: RiskLevel,
    /// Recommendations for the assigned tier, in display order.
    pub recommendations: Vec<String>,
}

impl ZoneResult {
    /// Builds a result, filling recommendations from the level's table.
    #[must_use]
    pub fn new(
        zone: ZoneDefinition,
        accident_count: u64,
        risk_score: u64,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            zone,
            accident_count,
            risk_score,
            risk_level,
            recommendations: risk_level
                .recommendations()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Display color for this zone's tier.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        self.risk_level.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn colors_match_fixed_palette() {
        assert_eq!(RiskLevel::Red.color(), "#dc2626");
        assert_eq!(RiskLevel::Orange.color(), "#ea580c");
        assert_eq!(RiskLevel::Yellow.color(), "#ca8a04");
        assert_eq!(RiskLevel::Green.color(), "#16a34a");
    }

    #[test]
    fn risk_color_falls_back_for_unknown_values() {
        assert_eq!(risk_color("red"), "#dc2626");
        assert_eq!(risk_color("green"), "#16a34a");
        assert_eq!(risk_color("purple"), UNKNOWN_RISK_COLOR);
        assert_eq!(risk_color(""), UNKNOWN_RISK_COLOR);
        assert_eq!(risk_color("RED"), UNKNOWN_RISK_COLOR);
    }

    #[test]
    fn recommendation_sets_are_disjoint_and_non_empty() {
        let mut seen = BTreeSet::new();
        for level in RiskLevel::all() {
            let recs = level.recommendations();
            assert!(!recs.is_empty(), "{level} has no recommendations");
            for rec in recs {
                assert!(seen.insert(*rec), "'{rec}' appears in more than one tier");
            }
        }
    }

    #[test]
    fn more_severe_tiers_have_longer_lists() {
        let lens: Vec<usize> = RiskLevel::all()
            .iter()
            .map(|l| l.recommendations().len())
            .collect();
        assert!(lens.windows(2).all(|w| w[0] > w[1]), "lengths: {lens:?}");
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(RiskLevel::Green < RiskLevel::Yellow);
        assert!(RiskLevel::Yellow < RiskLevel::Orange);
        assert!(RiskLevel::Orange < RiskLevel::Red);
        assert_eq!(RiskLevel::Green.rank(), 1);
        assert_eq!(RiskLevel::Red.rank(), 4);
    }

    #[test]
    fn zone_result_flattens_definition() {
        let zone = ZoneDefinition {
            id: "zone_8".to_string(),
            name: "Industrial Sector".to_string(),
            latitude: 40.6643,
            longitude: -73.9385,
            population: 5000,
        };
        let result = ZoneResult::new(zone, 4, 22, RiskLevel::Yellow);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["id"], "zone_8");
        assert_eq!(json["population"], 5000);
        assert_eq!(json["accidentCount"], 4);
        assert_eq!(json["riskScore"], 22);
        assert_eq!(json["riskLevel"], "yellow");
        assert_eq!(json["recommendations"][0], "Monitor traffic patterns");
    }
}
