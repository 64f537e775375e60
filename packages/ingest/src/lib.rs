#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reads road accident records from CSV and JSON files.
//!
//! This is the boundary where untrusted rows become typed
//! [`IncidentRecord`]s. In [`IngestMode::Strict`] the first bad row aborts
//! the read; in [`IngestMode::Lenient`] bad rows are logged and skipped and
//! counted in the [`IngestReport`]. Nothing past this boundary ever sees a
//! defaulted severity.

pub mod normalize;

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use accident_zones_accident_models::{DataError, IncidentRecord};
use accident_zones_ingest_models::{IngestMode, IngestReport, InputFormat};

use crate::normalize::RawIncident;

/// Errors that can occur while reading incident files.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record violated the incident data contract.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// The file extension does not name a supported format.
    #[error("Unsupported incident file '{path}': expected a .csv or .json extension")]
    UnsupportedFormat {
        /// The offending path.
        path: String,
    },
}

/// Validated incidents plus a summary of the read.
#[derive(Debug, Clone)]
pub struct Ingested {
    /// Accepted records, in source order.
    pub incidents: Vec<IncidentRecord>,
    /// Counts and timing for the read.
    pub report: IngestReport,
}

/// Reads an incident file, choosing the format from its extension.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened, its format is
/// unsupported, or (in strict mode) any record is invalid.
pub fn read_incidents(path: &Path, mode: IngestMode) -> Result<Ingested, IngestError> {
    let format = InputFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.display().to_string(),
    })?;

    let file = std::fs::File::open(path)?;
    let source_name = path.display().to_string();

    match format {
        InputFormat::Csv => read_csv(file, &source_name, mode),
        InputFormat::Json => read_json(file, &source_name, mode),
    }
}

/// Reads CSV rows with a header row using the record's wire names
/// (`id,latitude,longitude,date,time,severity,location,weather,roadType,casualties`).
///
/// # Errors
///
/// Returns [`IngestError`] if the header is unreadable or, in strict mode,
/// any row fails to decode or validate.
pub fn read_csv<R: Read>(
    reader: R,
    source_name: &str,
    mode: IngestMode,
) -> Result<Ingested, IngestError> {
    let start = Instant::now();
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut batch = Batch::new(mode);
    for row in csv_reader.deserialize::<RawIncident>() {
        match row {
            Err(e) if !is_record_error(&e) => return Err(e.into()),
            row => batch.push(row.map_err(IngestError::from))?,
        }
    }

    Ok(batch.finish(source_name, start))
}

/// Whether a CSV error is confined to one record. Anything else (I/O,
/// broken UTF-8 in the stream, seek failures) aborts the read in every
/// mode.
fn is_record_error(error: &csv::Error) -> bool {
    matches!(
        error.kind(),
        csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. }
    )
}

/// Reads a JSON array of incident objects.
///
/// # Errors
///
/// Returns [`IngestError`] if the document is not a JSON array or, in
/// strict mode, any element fails to decode or validate.
pub fn read_json<R: Read>(
    reader: R,
    source_name: &str,
    mode: IngestMode,
) -> Result<Ingested, IngestError> {
    let start = Instant::now();
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;

    let mut batch = Batch::new(mode);
    for value in values {
        batch.push(serde_json::from_value::<RawIncident>(value).map_err(IngestError::from))?;
    }

    Ok(batch.finish(source_name, start))
}

/// Accumulates normalized records and applies the ingest mode.
struct Batch {
    mode: IngestMode,
    seen_ids: BTreeSet<String>,
    incidents: Vec<IncidentRecord>,
    read: u64,
    skipped: u64,
}

impl Batch {
    const fn new(mode: IngestMode) -> Self {
        Self {
            mode,
            seen_ids: BTreeSet::new(),
            incidents: Vec::new(),
            read: 0,
            skipped: 0,
        }
    }

    fn push(&mut self, row: Result<RawIncident, IngestError>) -> Result<(), IngestError> {
        self.read += 1;

        match row.and_then(|raw| self.accept(raw).map_err(IngestError::from)) {
            Ok(record) => {
                self.incidents.push(record);
                Ok(())
            }
            Err(e) if self.mode == IngestMode::Lenient => {
                log::warn!("Skipping record {}: {e}", self.read);
                self.skipped += 1;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn accept(&mut self, raw: RawIncident) -> Result<IncidentRecord, DataError> {
        let record = normalize::normalize(raw)?;
        if !self.seen_ids.insert(record.id.clone()) {
            return Err(DataError::DuplicateId { id: record.id });
        }
        Ok(record)
    }

    fn finish(self, source_name: &str, start: Instant) -> Ingested {
        let report = IngestReport {
            source_name: source_name.to_string(),
            records_read: self.read,
            records_accepted: self.incidents.len() as u64,
            records_skipped: self.skipped,
            duration: start.elapsed(),
        };

        log::info!(
            "[{source_name}] Read {} records: {} accepted, {} skipped",
            report.records_read,
            report.records_accepted,
            report.records_skipped
        );

        Ingested {
            incidents: self.incidents,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accident_zones_accident_models::Severity;

    const CSV: &str = "\
id,latitude,longitude,date,time,severity,location,weather,roadType,casualties
acc_0_0,40.7130,-74.0055,2024-02-11,08:15,minor,Downtown Main St,clear,urban,0
acc_0_1,40.7125,-74.0062,2024-02-12,18:40,fatal,Downtown Main St,rain,intersection,3
acc_0_2,40.7127,-74.0059,2024-02-13,22:05,explosive,Downtown Main St,fog,highway,1
";

    #[test]
    fn strict_csv_rejects_unknown_severity() {
        let err = read_csv(CSV.as_bytes(), "inline", IngestMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Data(DataError::InvalidSeverity { ref id, .. }) if id == "acc_0_2"
        ));
    }

    #[test]
    fn lenient_csv_skips_unknown_severity() {
        let ingested = read_csv(CSV.as_bytes(), "inline", IngestMode::Lenient).unwrap();
        assert_eq!(ingested.incidents.len(), 2);
        assert_eq!(ingested.incidents[1].severity, Severity::Fatal);
        assert_eq!(ingested.report.records_read, 3);
        assert_eq!(ingested.report.records_accepted, 2);
        assert_eq!(ingested.report.records_skipped, 1);
    }

    #[test]
    fn lenient_csv_skips_undecodable_rows() {
        let csv = "\
id,latitude,longitude,date,time,severity,location,weather,roadType,casualties
acc_1,not-a-number,-74.0,2024-01-01,10:00,minor,Somewhere,clear,urban,0
acc_2,40.7,-74.0,2024-01-01,10:00,minor,Somewhere,clear,urban,0
";
        let ingested = read_csv(csv.as_bytes(), "inline", IngestMode::Lenient).unwrap();
        assert_eq!(ingested.incidents.len(), 1);
        assert_eq!(ingested.incidents[0].id, "acc_2");

        assert!(matches!(
            read_csv(csv.as_bytes(), "inline", IngestMode::Strict),
            Err(IngestError::Csv(_))
        ));
    }

    /// Yields `data`, then fails every later read.
    struct FailingReader {
        data: &'static [u8],
        done: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.done {
                return Err(std::io::Error::other("connection reset"));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            if self.data.is_empty() {
                self.done = true;
            }
            Ok(n)
        }
    }

    #[test]
    fn lenient_csv_propagates_io_errors() {
        let reader = FailingReader {
            data: b"id,latitude,longitude,date,time,severity,location,weather,roadType,casualties\n\
                    acc_1,40.7,-74.0,2024-01-01,10:00,minor,Somewhere,clear,urban,0\n",
            done: false,
        };

        let err = read_csv(reader, "stream", IngestMode::Lenient).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Csv(ref e) if matches!(e.kind(), csv::ErrorKind::Io(_))
        ));
    }

    #[test]
    fn lenient_csv_skips_short_rows() {
        let csv = "\
id,latitude,longitude,date,time,severity,location,weather,roadType,casualties
acc_1,40.7,-74.0,2024-01-01
acc_2,40.7,-74.0,2024-01-01,10:00,minor,Somewhere,clear,urban,0
";
        let ingested = read_csv(csv.as_bytes(), "inline", IngestMode::Lenient).unwrap();
        assert_eq!(ingested.incidents.len(), 1);
        assert_eq!(ingested.report.records_skipped, 1);
    }

    #[test]
    fn duplicate_ids_are_data_errors() {
        let csv = "\
id,latitude,longitude,date,time,severity,location,weather,roadType,casualties
dup,40.7,-74.0,2024-01-01,10:00,minor,A,clear,urban,0
dup,40.7,-74.0,2024-01-02,11:00,severe,B,snow,rural,2
";
        let err = read_csv(csv.as_bytes(), "inline", IngestMode::Strict).unwrap_err();
        assert!(matches!(err, IngestError::Data(DataError::DuplicateId { .. })));
    }

    #[test]
    fn reads_json_array() {
        let json = r#"[
            {"id": "a", "latitude": 40.7589, "longitude": -73.9851, "date": "2023-11-02",
             "time": "06:30", "severity": "severe", "location": "Highway 101 Junction",
             "weather": "snow", "roadType": "highway", "casualties": 2},
            {"id": "b", "latitude": 40.7590, "longitude": -73.9850, "date": "2023-11-03",
             "time": "07:00", "severity": "minor", "weather": "clear",
             "roadType": "highway", "casualties": 0}
        ]"#;
        let ingested = read_json(json.as_bytes(), "inline", IngestMode::Strict).unwrap();
        assert_eq!(ingested.incidents.len(), 2);
        assert_eq!(ingested.incidents[1].location, "");
        assert_eq!(ingested.report.records_skipped, 0);
    }

    #[test]
    fn json_that_is_not_an_array_fails() {
        assert!(matches!(
            read_json(r#"{"id": "a"}"#.as_bytes(), "inline", IngestMode::Lenient),
            Err(IngestError::Json(_))
        ));
    }

    #[test]
    fn unsupported_extension_is_reported() {
        assert!(matches!(
            read_incidents(Path::new("incidents.parquet"), IngestMode::Strict),
            Err(IngestError::UnsupportedFormat { .. })
        ));
    }
}
