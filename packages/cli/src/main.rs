#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the accident zone risk engine.
//!
//! Reads an incident file (CSV or JSON) and a zone catalog (built-in or
//! TOML), classifies every zone and writes JSON to stdout. Logs go to
//! stderr and are controlled with `RUST_LOG`.

use std::path::{Path, PathBuf};

use accident_zones_catalog::{ZoneCatalog, registry};
use accident_zones_classification::{AttributionStrategy, EngineConfig, ZoneRiskEngine};
use accident_zones_ingest::Ingested;
use accident_zones_ingest_models::IngestMode;
use accident_zones_spatial::DistanceMetric;
use accident_zones_zone_models::{RiskLevel, risk_color};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "accident_zones", about = "Road accident zone risk classification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every zone and print the results
    Classify(RunArgs),
    /// Classify and print tier counts, breakdowns, and ranked zones
    Summary(RunArgs),
    /// Print the display color for a risk level
    Color {
        /// Risk level name (red, orange, yellow, green)
        level: String,
    },
    /// List the built-in zone catalogs
    Catalogs,
    /// Print recommendations and actions for every tier
    Tiers {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Incident file (.csv or .json)
    #[arg(long)]
    incidents: PathBuf,

    /// Zone catalog TOML file
    #[arg(long, conflicts_with = "builtin")]
    catalog: Option<PathBuf>,

    /// Built-in zone catalog id
    #[arg(long)]
    builtin: Option<String>,

    /// Engine options TOML file (`distance`, `attribution`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Distance metric (planar, haversine)
    #[arg(long)]
    distance: Option<DistanceMetric>,

    /// Attribution strategy (rtree, scan)
    #[arg(long)]
    attribution: Option<AttributionStrategy>,

    /// Skip invalid incident records instead of failing
    #[arg(long)]
    lenient: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl RunArgs {
    fn ingest_mode(&self) -> IngestMode {
        if self.lenient {
            IngestMode::Lenient
        } else {
            IngestMode::Strict
        }
    }

    fn load_catalog(&self) -> Result<ZoneCatalog, Box<dyn std::error::Error>> {
        let catalog = match (&self.catalog, &self.builtin) {
            (Some(path), _) => ZoneCatalog::load(path)?,
            (None, Some(id)) => registry::builtin(id)?,
            (None, None) => registry::builtin(registry::DEFAULT_CATALOG)?,
        };
        log::info!(
            "Using catalog '{}' ({} zones)",
            catalog.id(),
            catalog.len()
        );
        Ok(catalog)
    }

    fn engine_config(&self) -> Result<EngineConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => read_engine_config(path)?,
            None => EngineConfig::default(),
        };
        if let Some(distance) = self.distance {
            config.distance = distance;
        }
        if let Some(attribution) = self.attribution {
            config.attribution = attribution;
        }
        Ok(config)
    }
}

fn read_engine_config(path: &Path) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Tier metadata as printed by `tiers`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TierInfo {
    level: RiskLevel,
    rank: u8,
    color: &'static str,
    description: &'static str,
    action: &'static str,
    timeline: &'static str,
    recommendations: &'static [&'static str],
}

impl From<RiskLevel> for TierInfo {
    fn from(level: RiskLevel) -> Self {
        Self {
            level,
            rank: level.rank(),
            color: level.color(),
            description: level.description(),
            action: level.action(),
            timeline: level.timeline(),
            recommendations: level.recommendations(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify(args) => {
            let (catalog_id, ingested, results) = classify(&args)?;
            log::info!(
                "Classified {} zones of '{catalog_id}' from {} incidents",
                results.len(),
                ingested.incidents.len()
            );
            print_json(&results, args.pretty)?;
        }
        Commands::Summary(args) => {
            let (catalog_id, ingested, results) = classify(&args)?;
            let summary =
                accident_zones_analytics::summarize(&catalog_id, &ingested.incidents, &results);
            print_json(&summary, args.pretty)?;
        }
        Commands::Color { level } => println!("{}", risk_color(&level)),
        Commands::Catalogs => {
            for id in registry::catalog_ids() {
                println!("{id}");
            }
        }
        Commands::Tiers { pretty } => {
            let tiers: Vec<TierInfo> = RiskLevel::all().iter().copied().map(TierInfo::from).collect();
            print_json(&tiers, pretty)?;
        }
    }

    Ok(())
}

type Classified = (
    String,
    Ingested,
    Vec<accident_zones_zone_models::ZoneResult>,
);

fn classify(args: &RunArgs) -> Result<Classified, Box<dyn std::error::Error>> {
    let catalog = args.load_catalog()?;
    let config = args.engine_config()?;
    let ingested = accident_zones_ingest::read_incidents(&args.incidents, args.ingest_mode())?;

    let catalog_id = catalog.id().to_string();
    let engine = ZoneRiskEngine::with_config(catalog, config);
    let results = engine.classify(&ingested.incidents)?;

    Ok((catalog_id, ingested, results))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
