//! Compile-time registry of built-in zone catalogs.
//!
//! Each entry is an `(id, toml_content)` pair embedded via `include_str!`.
//! Adding a catalog requires creating a TOML file in `sources/` and adding
//! a corresponding entry here.

use crate::{ConfigurationError, ZoneCatalog};

/// Number of registered catalogs. Enforced by a test.
#[cfg(test)]
const EXPECTED_CATALOG_COUNT: usize = 1;

/// Embedded TOML catalog definitions.
const CATALOG_TOMLS: &[(&str, &str)] = &[("nyc", include_str!("../sources/nyc.toml"))];

/// Catalog used when the caller does not choose one.
pub const DEFAULT_CATALOG: &str = "nyc";

/// Ids of all built-in catalogs, in registration order.
#[must_use]
pub fn catalog_ids() -> Vec<&'static str> {
    CATALOG_TOMLS.iter().map(|(id, _)| *id).collect()
}

/// Loads and validates the built-in catalog with the given id.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownCatalog`] if no catalog has that
/// id, or any parse/validation error from the embedded TOML.
pub fn builtin(id: &str) -> Result<ZoneCatalog, ConfigurationError> {
    let (_, content) = CATALOG_TOMLS
        .iter()
        .find(|(name, _)| *name == id)
        .ok_or_else(|| ConfigurationError::UnknownCatalog { id: id.to_string() })?;

    let catalog = ZoneCatalog::from_toml_str(content)?;
    log::debug!("Loaded built-in catalog '{id}' ({} zones)", catalog.len());
    Ok(catalog)
}
