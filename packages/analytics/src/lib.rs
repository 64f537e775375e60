#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics over incidents and classified zones.
//!
//! Every function here is a pure fold over its input. Category breakdowns
//! always list every variant in declaration order, including zero counts,
//! so consumers can render fixed-shape charts.

use std::collections::BTreeSet;

use accident_zones_accident_models::{IncidentRecord, RoadType, Severity, Weather};
use accident_zones_analytics_models::{AnalysisSummary, CategoryCount, TierCounts, TimeSeriesPoint};
use accident_zones_zone_models::{RiskLevel, ZoneResult};
use chrono::{Datelike as _, Timelike as _};

/// Month labels for [`monthly_counts`], January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Counts zones per risk tier.
#[must_use]
pub fn tier_counts(results: &[ZoneResult]) -> TierCounts {
    let mut counts = TierCounts::default();
    for result in results {
        counts.record(result.risk_level);
    }
    counts
}

/// Percentage of zones classified green or yellow, rounded to the nearest
/// integer. Zero when there are no zones.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn safe_zone_percentage(tiers: &TierCounts) -> u64 {
    let total = tiers.total();
    if total == 0 {
        return 0;
    }
    let safe = tiers.green + tiers.yellow;
    (100.0 * safe as f64 / total as f64).round() as u64
}

fn breakdown<T, K>(incidents: &[IncidentRecord], variants: &[T], key: K) -> Vec<CategoryCount>
where
    T: Copy + PartialEq + AsRef<str>,
    K: Fn(&IncidentRecord) -> T,
{
    variants
        .iter()
        .map(|&variant| CategoryCount {
            category: variant.as_ref().to_string(),
            count: incidents.iter().filter(|i| key(i) == variant).count() as u64,
        })
        .collect()
}

/// Incidents per severity, minor first.
#[must_use]
pub fn severity_breakdown(incidents: &[IncidentRecord]) -> Vec<CategoryCount> {
    breakdown(incidents, Severity::all(), |i| i.severity)
}

/// Incidents per weather condition.
#[must_use]
pub fn weather_breakdown(incidents: &[IncidentRecord]) -> Vec<CategoryCount> {
    breakdown(incidents, Weather::all(), |i| i.weather)
}

/// Incidents per road type.
#[must_use]
pub fn road_type_breakdown(incidents: &[IncidentRecord]) -> Vec<CategoryCount> {
    breakdown(incidents, RoadType::all(), |i| i.road_type)
}

/// Incidents per calendar month, folding all years together.
#[must_use]
pub fn monthly_counts(incidents: &[IncidentRecord]) -> Vec<TimeSeriesPoint> {
    let mut buckets = [0_u64; 12];
    for incident in incidents {
        buckets[incident.date.month0() as usize] += 1;
    }

    MONTH_LABELS
        .iter()
        .zip(buckets)
        .map(|(label, count)| TimeSeriesPoint {
            period: (*label).to_string(),
            count,
        })
        .collect()
}

/// Incidents per hour of day, `00:00` through `23:00`.
#[must_use]
pub fn hourly_counts(incidents: &[IncidentRecord]) -> Vec<TimeSeriesPoint> {
    let mut buckets = [0_u64; 24];
    for incident in incidents {
        buckets[incident.time.hour() as usize] += 1;
    }

    (0_u32..)
        .zip(buckets)
        .map(|(hour, count)| TimeSeriesPoint {
            period: format!("{hour:02}:00"),
            count,
        })
        .collect()
}

/// The hour of day with the most incidents. Ties go to the earliest hour.
#[must_use]
pub fn peak_hour(incidents: &[IncidentRecord]) -> Option<u32> {
    peak_of(&hourly_counts(incidents))
}

fn peak_of(hours: &[TimeSeriesPoint]) -> Option<u32> {
    let mut peak: Option<(u32, u64)> = None;
    for (hour, point) in (0_u32..).zip(hours) {
        if point.count > 0 && peak.is_none_or(|(_, best)| point.count > best) {
            peak = Some((hour, point.count));
        }
    }
    peak.map(|(hour, _)| hour)
}

/// Sum of casualties over all incidents.
#[must_use]
pub fn total_casualties(incidents: &[IncidentRecord]) -> u64 {
    incidents.iter().map(|i| u64::from(i.casualties)).sum()
}

/// Incidents rated severe or fatal.
#[must_use]
pub fn serious_incidents(incidents: &[IncidentRecord]) -> u64 {
    incidents
        .iter()
        .filter(|i| i.severity >= Severity::Severe)
        .count() as u64
}

/// Number of distinct location names, compared exactly.
#[must_use]
pub fn distinct_locations(incidents: &[IncidentRecord]) -> u64 {
    incidents
        .iter()
        .map(|i| i.location.as_str())
        .collect::<BTreeSet<_>>()
        .len() as u64
}

/// Orders zones from red to green. Zones in the same tier keep their
/// input order.
#[must_use]
pub fn rank_zones(results: &[ZoneResult]) -> Vec<ZoneResult> {
    let mut ranked = results.to_vec();
    ranked.sort_by_key(|r| std::cmp::Reverse(r.risk_level));
    ranked
}

/// Zones at exactly `level`, in input order.
#[must_use]
pub fn zones_at(results: &[ZoneResult], level: RiskLevel) -> Vec<&ZoneResult> {
    results.iter().filter(|r| r.risk_level == level).collect()
}

/// Builds the full summary for one classification run.
#[must_use]
pub fn summarize(
    catalog_id: &str,
    incidents: &[IncidentRecord],
    results: &[ZoneResult],
) -> AnalysisSummary {
    let tiers = tier_counts(results);
    let by_hour = hourly_counts(incidents);
    let summary = AnalysisSummary {
        catalog_id: catalog_id.to_string(),
        tiers,
        safe_zone_percentage: safe_zone_percentage(&tiers),
        total_incidents: incidents.len() as u64,
        total_attributed: results.iter().map(|r| r.accident_count).sum(),
        by_severity: severity_breakdown(incidents),
        by_weather: weather_breakdown(incidents),
        by_road_type: road_type_breakdown(incidents),
        by_month: monthly_counts(incidents),
        peak_hour: peak_of(&by_hour),
        by_hour,
        total_casualties: total_casualties(incidents),
        serious_incidents: serious_incidents(incidents),
        distinct_locations: distinct_locations(incidents),
        ranked_zones: rank_zones(results),
    };

    log::debug!(
        "Summary for {catalog_id}: {} red, {} orange, {} yellow, {} green ({}% safe)",
        tiers.red,
        tiers.orange,
        tiers.yellow,
        tiers.green,
        summary.safe_zone_percentage
    );

    summary
}
