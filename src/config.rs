//! Tool configuration
//!
//! Both command line tools share one configuration: where the catalog lives,
//! where artifacts are written, each tool's default search radius, and
//! whether a missing coordinate may be requested interactively. Values come
//! from built-in defaults, then an optional JSON file, then the
//! `FIRSTFIELD_CATALOG` environment variable, then command line flags.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{FirstFieldError, Result};

/// Environment variable that overrides the catalog path
pub const CATALOG_ENV_VAR: &str = "FIRSTFIELD_CATALOG";

/// Default search radius for the table tool (degrees)
pub const DEFAULT_TABLE_RADIUS_DEG: f64 = 1.0;

/// Default search radius for the visualization tool (degrees)
pub const DEFAULT_PLOT_RADIUS_DEG: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Catalog file (CSV or gzipped CSV)
    pub catalog_path: PathBuf,
    /// Directory the HTML and image artifacts are written to
    pub output_dir: PathBuf,
    /// Radius used by the table tool when none is given
    pub table_radius_deg: f64,
    /// Radius used by the visualization tool when none is given
    pub plot_radius_deg: f64,
    /// Prompt for missing coordinates instead of failing
    pub interactive: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("FIRST_data.csv"),
            output_dir: PathBuf::from("."),
            table_radius_deg: DEFAULT_TABLE_RADIUS_DEG,
            plot_radius_deg: DEFAULT_PLOT_RADIUS_DEG,
            interactive: true,
        }
    }
}

impl ToolConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ToolConfig = serde_json::from_str(text)
            .map_err(|e| FirstFieldError::ConfigError(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path).map_err(|e| {
            FirstFieldError::ConfigError(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Defaults, overlaid with the optional file and then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(env::var(CATALOG_ENV_VAR).ok()))
    }

    /// Apply a catalog path taken from the environment, if set and non-empty
    pub fn with_env_overrides(mut self, catalog: Option<String>) -> Self {
        if let Some(catalog) = catalog.filter(|c| !c.trim().is_empty()) {
            self.catalog_path = PathBuf::from(catalog);
        }
        self
    }

    /// Check that both default radii are usable
    pub fn validate(&self) -> Result<()> {
        validate_radius("table_radius_deg", self.table_radius_deg)?;
        validate_radius("plot_radius_deg", self.plot_radius_deg)
    }
}

/// A search radius must be a finite, positive number of degrees
pub fn validate_radius(name: &str, radius_deg: f64) -> Result<()> {
    if radius_deg.is_finite() && radius_deg > 0.0 {
        Ok(())
    } else {
        Err(FirstFieldError::ConfigError(format!(
            "{} must be a positive number of degrees, got {}",
            name, radius_deg
        )))
    }
}
