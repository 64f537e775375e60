#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone catalog loading and validation.
//!
//! A catalog is the fixed list of zones a classification pass reports on.
//! Catalogs are written in TOML, either shipped inside the binary (see
//! [`registry`]) or read from disk. Every catalog is validated when it is
//! loaded, so a [`ZoneCatalog`] always holds zones with unique ids, valid
//! centroids and a positive population.

pub mod registry;

use std::collections::BTreeSet;
use std::path::Path;

use accident_zones_zone_models::ZoneDefinition;
use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating a zone catalog.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// Reading the catalog file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file is not valid TOML for the catalog schema.
    #[error("Catalog parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No embedded catalog has the requested id.
    #[error("Unknown built-in catalog '{id}'")]
    UnknownCatalog {
        /// The requested id.
        id: String,
    },

    /// The catalog lists no zones.
    #[error("Catalog '{catalog}' defines no zones")]
    Empty {
        /// Catalog identifier.
        catalog: String,
    },

    /// A zone has a blank id.
    #[error("Zone '{name}' has an empty id")]
    MissingZoneId {
        /// Name of the offending zone.
        name: String,
    },

    /// Two zones share an id.
    #[error("Duplicate zone id '{id}'")]
    DuplicateZoneId {
        /// The repeated id.
        id: String,
    },

    /// A zone centroid is non-finite or outside the WGS84 range.
    #[error("Zone '{id}' has invalid centroid ({latitude}, {longitude})")]
    InvalidCentroid {
        /// Zone id.
        id: String,
        /// Rejected latitude.
        latitude: f64,
        /// Rejected longitude.
        longitude: f64,
    },

    /// A zone population is zero or negative.
    #[error("Zone '{id}' has non-positive population {population}")]
    NonPositivePopulation {
        /// Zone id.
        id: String,
        /// Rejected population.
        population: i64,
    },
}

/// On-disk catalog layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSource {
    /// Unique catalog identifier (e.g. `"nyc"`).
    pub id: String,
    /// Human-readable catalog name.
    pub name: String,
    /// Zones in report order.
    pub zones: Vec<ZoneDefinition>,
}

/// A validated, ordered list of zones.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCatalog {
    id: String,
    name: String,
    zones: Vec<ZoneDefinition>,
}

impl ZoneCatalog {
    /// Validates `zones` and wraps them in a catalog, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the list is empty, or any zone has
    /// a blank or repeated id, an invalid centroid, or a population that is
    /// not positive.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        zones: Vec<ZoneDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let id = id.into();

        if zones.is_empty() {
            return Err(ConfigurationError::Empty { catalog: id });
        }

        let mut seen = BTreeSet::new();
        for zone in &zones {
            validate_zone(zone)?;
            if !seen.insert(zone.id.as_str()) {
                return Err(ConfigurationError::DuplicateZoneId {
                    id: zone.id.clone(),
                });
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            zones,
        })
    }

    /// Parses and validates a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the TOML is malformed or the
    /// catalog fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        let source: CatalogSource = toml::from_str(content)?;
        Self::try_from(source)
    }

    /// Reads and validates a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the file cannot be read, is not a
    /// valid catalog, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded catalog '{}' with {} zones from {}",
            catalog.id,
            catalog.zones.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Catalog identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable catalog name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zones in catalog order.
    #[must_use]
    pub fn zones(&self) -> &[ZoneDefinition] {
        &self.zones
    }

    /// Number of zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Always `false` for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl TryFrom<CatalogSource> for ZoneCatalog {
    type Error = ConfigurationError;

    fn try_from(source: CatalogSource) -> Result<Self, Self::Error> {
        Self::new(source.id, source.name, source.zones)
    }
}

fn validate_zone(zone: &ZoneDefinition) -> Result<(), ConfigurationError> {
    if zone.id.trim().is_empty() {
        return Err(ConfigurationError::MissingZoneId {
            name: zone.name.clone(),
        });
    }

    let centroid_ok = zone.latitude.is_finite()
        && zone.longitude.is_finite()
        && (-90.0..=90.0).contains(&zone.latitude)
        && (-180.0..=180.0).contains(&zone.longitude);
    if !centroid_ok {
        return Err(ConfigurationError::InvalidCentroid {
            id: zone.id.clone(),
            latitude: zone.latitude,
            longitude: zone.longitude,
        });
    }

    if zone.population <= 0 {
        return Err(ConfigurationError::NonPositivePopulation {
            id: zone.id.clone(),
            population: zone.population,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: &str, population: i64) -> ZoneDefinition {
        ZoneDefinition {
            id: id.to_string(),
            name: format!("Zone {id}"),
            latitude: 40.7,
            longitude: -74.0,
            population,
        }
    }

    #[test]
    fn accepts_valid_zones_in_order() {
        let catalog =
            ZoneCatalog::new("test", "Test", vec![zone("b", 100), zone("a", 200)]).unwrap();
        let ids: Vec<&str> = catalog.zones().iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn rejects_zero_population() {
        let err = ZoneCatalog::new("test", "Test", vec![zone("a", 0)]).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::NonPositivePopulation { population: 0, .. }
        ));
    }

    #[test]
    fn rejects_negative_population() {
        let err = ZoneCatalog::new("test", "Test", vec![zone("a", -5)]).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::NonPositivePopulation { population: -5, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err =
            ZoneCatalog::new("test", "Test", vec![zone("a", 10), zone("a", 20)]).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateZoneId { .. }));
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = ZoneCatalog::new("test", "Test", Vec::new()).unwrap_err();
        assert!(matches!(err, ConfigurationError::Empty { .. }));
    }

    #[test]
    fn rejects_invalid_centroid() {
        let mut bad = zone("a", 10);
        bad.longitude = f64::INFINITY;
        let err = ZoneCatalog::new("test", "Test", vec![bad]).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidCentroid { .. }));
    }

    #[test]
    fn parses_toml() {
        let content = r#"
            id = "tiny"
            name = "Tiny catalog"

            [[zones]]
            id = "z1"
            name = "Harbor"
            latitude = 40.70
            longitude = -74.01
            population = 12000
        "#;
        let catalog = ZoneCatalog::from_toml_str(content).unwrap();
        assert_eq!(catalog.id(), "tiny");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.zones()[0].population, 12000);
    }

    #[test]
    fn toml_with_negative_population_is_a_configuration_error() {
        let content = r#"
            id = "bad"
            name = "Bad catalog"

            [[zones]]
            id = "z1"
            name = "Harbor"
            latitude = 40.70
            longitude = -74.01
            population = -1
        "#;
        assert!(matches!(
            ZoneCatalog::from_toml_str(content),
            Err(ConfigurationError::NonPositivePopulation { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(matches!(
            ZoneCatalog::from_toml_str("id = "),
            Err(ConfigurationError::Toml(_))
        ));
    }
}
