#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion options and result types.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How the ingestion boundary reacts to an invalid record.
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
pub enum IngestMode {
    /// Abort on the first invalid record.
    #[default]
    Strict,
    /// Log invalid records at `warn` level and skip them.
    Lenient,
}

/// Serialization format of an incident file.
#[derive(
    Debug,
    Clone,
    Copy,
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InputFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON array of records.
    Json,
}

impl InputFormat {
    /// Infers the format from a file extension (`.csv` or `.json`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

/// Outcome of reading one incident file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Where the records came from (usually a file path).
    pub source_name: String,
    /// Records read from the source, valid or not.
    pub records_read: u64,
    /// Records that passed validation.
    pub records_accepted: u64,
    /// Records skipped in lenient mode.
    pub records_skipped: u64,
    /// How long reading and validation took.
    pub duration: Duration,
}
