//! Raw record shape and normalization into [`IncidentRecord`].
//!
//! Sources hand us loosely typed rows. Every enumerated field arrives as a
//! string and is parsed here, so an unknown severity surfaces as a
//! [`DataError`] naming the record instead of a generic decode failure.

use accident_zones_accident_models::{
    DATE_FORMAT, DataError, IncidentRecord, RoadType, Severity, TIME_FORMAT, Weather,
    validate_coordinate,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

/// An incident row as it appears in a CSV or JSON source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIncident {
    /// Record identifier.
    pub id: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    /// Severity name.
    pub severity: String,
    /// Place name. Optional in sources.
    #[serde(default)]
    pub location: String,
    /// Weather name.
    pub weather: String,
    /// Road type name.
    pub road_type: String,
    /// Casualty count; signed so negative values can be reported.
    pub casualties: i64,
}

/// Validates a raw row and converts it into an [`IncidentRecord`].
///
/// # Errors
///
/// Returns [`DataError`] for the first field that does not satisfy the
/// incident data contract.
pub fn normalize(raw: RawIncident) -> Result<IncidentRecord, DataError> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Err(DataError::MissingId);
    }

    validate_coordinate(&id, raw.latitude, raw.longitude)?;

    let severity = raw
        .severity
        .trim()
        .parse::<Severity>()
        .map_err(|_| DataError::InvalidSeverity {
            id: id.clone(),
            value: raw.severity.clone(),
        })?;

    let weather = raw
        .weather
        .trim()
        .parse::<Weather>()
        .map_err(|_| DataError::InvalidWeather {
            id: id.clone(),
            value: raw.weather.clone(),
        })?;

    let road_type = raw
        .road_type
        .trim()
        .parse::<RoadType>()
        .map_err(|_| DataError::InvalidRoadType {
            id: id.clone(),
            value: raw.road_type.clone(),
        })?;

    let date = NaiveDate::parse_from_str(raw.date.trim(), DATE_FORMAT).map_err(|_| {
        DataError::InvalidDate {
            id: id.clone(),
            value: raw.date.clone(),
        }
    })?;

    let time = NaiveTime::parse_from_str(raw.time.trim(), TIME_FORMAT).map_err(|_| {
        DataError::InvalidTime {
            id: id.clone(),
            value: raw.time.clone(),
        }
    })?;

    let casualties = u32::try_from(raw.casualties).map_err(|_| DataError::NegativeCasualties {
        id: id.clone(),
        value: raw.casualties,
    })?;

    Ok(IncidentRecord {
        id,
        latitude: raw.latitude,
        longitude: raw.longitude,
        date,
        time,
        severity,
        location: raw.location.trim().to_string(),
        weather,
        road_type,
        casualties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawIncident {
        RawIncident {
            id: "acc_3_1".to_string(),
            latitude: 40.7061,
            longitude: -73.9969,
            date: "2024-06-01".to_string(),
            time: "17:45".to_string(),
            severity: "Moderate".to_string(),
            location: " Brooklyn Bridge ".to_string(),
            weather: "clear".to_string(),
            road_type: "urban".to_string(),
            casualties: 1,
        }
    }

    #[test]
    fn normalizes_valid_row() {
        let record = normalize(raw()).unwrap();
        assert_eq!(record.severity, Severity::Moderate);
        assert_eq!(record.road_type, RoadType::Urban);
        assert_eq!(record.location, "Brooklyn Bridge");
        assert_eq!(record.time, NaiveTime::from_hms_opt(17, 45, 0).unwrap());
    }

    #[test]
    fn unknown_severity_is_a_data_error() {
        let mut row = raw();
        row.severity = "catastrophic".to_string();
        assert_eq!(
            normalize(row),
            Err(DataError::InvalidSeverity {
                id: "acc_3_1".to_string(),
                value: "catastrophic".to_string(),
            })
        );
    }

    #[test]
    fn empty_severity_is_not_defaulted() {
        let mut row = raw();
        row.severity = String::new();
        assert!(matches!(
            normalize(row),
            Err(DataError::InvalidSeverity { .. })
        ));
    }

    #[test]
    fn negative_casualties_are_rejected() {
        let mut row = raw();
        row.casualties = -2;
        assert!(matches!(
            normalize(row),
            Err(DataError::NegativeCasualties { value: -2, .. })
        ));
    }

    #[test]
    fn malformed_date_and_time_are_rejected() {
        let mut row = raw();
        row.date = "06/01/2024".to_string();
        assert!(matches!(normalize(row), Err(DataError::InvalidDate { .. })));

        let mut row = raw();
        row.time = "25:10".to_string();
        assert!(matches!(normalize(row), Err(DataError::InvalidTime { .. })));
    }

    #[test]
    fn out_of_range_coordinate_is_rejected() {
        let mut row = raw();
        row.longitude = -200.0;
        assert!(matches!(
            normalize(row),
            Err(DataError::InvalidCoordinate { .. })
        ));
    }
}
