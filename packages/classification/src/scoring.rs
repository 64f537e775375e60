//! Risk score formula and tier rules.
//!
//! ```text
//! severity_sum = Σ severity weight of attributed incidents
//! risk_score   = round((accidents * 10 + severity_sum * 5) / (population / 1000))
//! ```
//!
//! Rounding is half away from zero (`f64::round`).

use std::num::NonZeroU64;

use accident_zones_accident_models::Severity;
use accident_zones_zone_models::RiskLevel;

/// Score contribution of each attributed accident.
pub const ACCIDENT_WEIGHT: u64 = 10;

/// Score contribution of each unit of severity weight.
pub const SEVERITY_WEIGHT: u64 = 5;

/// Population is expressed in thousands in the denominator.
pub const POPULATION_UNIT: f64 = 1000.0;

/// A tier and the thresholds that select it. A zone meets the rule when
/// either threshold is reached.
struct TierRule {
    level: RiskLevel,
    min_accidents: u64,
    min_score: u64,
}

/// Evaluated top to bottom; the first rule met wins. Zones meeting none
/// are green.
const TIER_RULES: [TierRule; 3] = [
    TierRule {
        level: RiskLevel::Red,
        min_accidents: 20,
        min_score: 80,
    },
    TierRule {
        level: RiskLevel::Orange,
        min_accidents: 10,
        min_score: 50,
    },
    TierRule {
        level: RiskLevel::Yellow,
        min_accidents: 3,
        min_score: 20,
    },
];

/// Sums the severity weights of a zone's incidents.
#[must_use]
pub fn severity_sum(severities: impl IntoIterator<Item = Severity>) -> u64 {
    severities
        .into_iter()
        .map(Severity::weight)
        .fold(0, u64::saturating_add)
}

/// Computes a zone's population-normalized risk score.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn risk_score(accident_count: u64, severity_sum: u64, population: NonZeroU64) -> u64 {
    let weighted = accident_count
        .saturating_mul(ACCIDENT_WEIGHT)
        .saturating_add(severity_sum.saturating_mul(SEVERITY_WEIGHT));
    let thousands = population.get() as f64 / POPULATION_UNIT;
    (weighted as f64 / thousands).round() as u64
}

/// Maps an accident count and risk score to a tier.
///
/// Total over all inputs and monotone in both arguments.
#[must_use]
pub fn classify(accident_count: u64, risk_score: u64) -> RiskLevel {
    TIER_RULES
        .iter()
        .find(|rule| accident_count >= rule.min_accidents || risk_score >= rule.min_score)
        .map_or(RiskLevel::Green, |rule| rule.level)
}
