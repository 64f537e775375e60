#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Road accident record types and severity definitions.
//!
//! This crate defines the canonical [`IncidentRecord`] consumed by the zone
//! risk engine, the closed enumerations that describe each accident, and
//! the [`DataError`] raised when a record does not fit those enumerations.
//! Every data source normalizes into these types before classification.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity of an accident, ordered by increasing harm.
///
/// The discriminant doubles as the severity weight used by risk scoring.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    /// Property damage or light injuries.
    Minor = 1,
    /// Injuries requiring treatment.
    Moderate = 2,
    /// Hospitalization or permanent injury.
    Severe = 3,
    /// At least one death.
    Fatal = 4,
}

impl Severity {
    /// Returns the weight this severity contributes to a zone's severity sum.
    #[must_use]
    pub const fn weight(self) -> u64 {
        self as u64
    }

    /// Returns all variants of this enum, least severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minor, Self::Moderate, Self::Severe, Self::Fatal]
    }
}

/// Weather at the time of the accident.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Weather {
    /// Clear
    Clear,
    /// Rain
    Rain,
    /// Fog
    Fog,
    /// Snow
    Snow,
}

impl Weather {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Clear, Self::Rain, Self::Fog, Self::Snow]
    }
}

/// Kind of road the accident happened on.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RoadType {
    /// Limited-access highway
    Highway,
    /// City street
    Urban,
    /// Rural road
    Rural,
    /// Junction of two or more roads
    Intersection,
}

impl RoadType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Highway, Self::Urban, Self::Rural, Self::Intersection]
    }
}

/// A single recorded road accident.
///
/// Records are immutable once normalized. Only `latitude`, `longitude` and
/// `severity` feed the zone classification; the remaining fields are kept
/// for display and analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Unique record identifier.
    pub id: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Calendar date of the accident.
    pub date: NaiveDate,
    /// Local time of day, serialized as `HH:MM`.
    #[serde(with = "hour_minute")]
    pub time: NaiveTime,
    /// How harmful the accident was.
    pub severity: Severity,
    /// Free-text place name.
    pub location: String,
    /// Weather at the time of the accident.
    pub weather: Weather,
    /// Kind of road.
    pub road_type: RoadType,
    /// Number of people hurt or killed.
    pub casualties: u32,
}

impl IncidentRecord {
    /// Checks the invariants that the type system cannot express: a
    /// non-empty id and a finite coordinate inside the WGS84 range.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.id.trim().is_empty() {
            return Err(DataError::MissingId);
        }
        validate_coordinate(&self.id, self.latitude, self.longitude)
    }
}

/// Returns `Ok` when `(latitude, longitude)` is a finite WGS84 coordinate.
///
/// # Errors
///
/// Returns [`DataError::InvalidCoordinate`] when either component is
/// non-finite or out of range.
pub fn validate_coordinate(id: &str, latitude: f64, longitude: f64) -> Result<(), DataError> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);

    if valid {
        Ok(())
    } else {
        Err(DataError::InvalidCoordinate {
            id: id.to_string(),
            latitude,
            longitude,
        })
    }
}

/// Format used for the `time` field on the wire.
pub const TIME_FORMAT: &str = "%H:%M";

/// Format used for the `date` field on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Serde adapter for `HH:MM` times.
pub mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    /// Serializes a time as `HH:MM`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    /// Deserializes a `HH:MM` time.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string in `HH:MM` form.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A record that does not satisfy the incident data contract.
///
/// Raised at the ingestion boundary; invalid values are never defaulted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    /// Record has an empty identifier.
    #[error("Incident record has an empty id")]
    MissingId,

    /// Identifier was already used by an earlier record.
    #[error("Duplicate incident id '{id}'")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },

    /// Severity is not one of minor, moderate, severe, fatal.
    #[error("Incident '{id}' has invalid severity '{value}': expected minor, moderate, severe or fatal")]
    InvalidSeverity {
        /// Record identifier.
        id: String,
        /// The rejected value.
        value: String,
    },

    /// Weather is not one of clear, rain, fog, snow.
    #[error("Incident '{id}' has invalid weather '{value}': expected clear, rain, fog or snow")]
    InvalidWeather {
        /// Record identifier.
        id: String,
        /// The rejected value.
        value: String,
    },

    /// Road type is not one of highway, urban, rural, intersection.
    #[error(
        "Incident '{id}' has invalid road type '{value}': expected highway, urban, rural or intersection"
    )]
    InvalidRoadType {
        /// Record identifier.
        id: String,
        /// The rejected value.
        value: String,
    },

    /// Coordinate is non-finite or outside the WGS84 range.
    #[error("Incident '{id}' has invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Record identifier.
        id: String,
        /// Rejected latitude.
        latitude: f64,
        /// Rejected longitude.
        longitude: f64,
    },

    /// Date is not a `YYYY-MM-DD` calendar date.
    #[error("Incident '{id}' has invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// Record identifier.
        id: String,
        /// The rejected value.
        value: String,
    },

    /// Time is not a 24-hour `HH:MM` time.
    #[error("Incident '{id}' has invalid time '{value}': expected HH:MM")]
    InvalidTime {
        /// Record identifier.
        id: String,
        /// The rejected value.
        value: String,
    },

    /// Casualty count is negative.
    #[error("Incident '{id}' has negative casualty count {value}")]
    NegativeCasualties {
        /// Record identifier.
        id: String,
        /// The rejected value.
        value: i64,
    },
}
