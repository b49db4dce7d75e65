//! Firstfield: cone queries over the FIRST radio source catalog
//!
//! This crate finds every catalog source within an angular radius of a sky
//! position (or of a named FIRST source), annotates each one with its angular
//! distance from the query point, and hands the result to a table or
//! scatter-plot presentation layer.

use std::num::ParseFloatError;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod catalogs;
pub mod config;
pub mod coordinates;
pub mod presentation;
pub mod query;

// Re-export commonly used types
pub use catalogs::{Catalog, CatalogLoader, CatalogRow};
pub use config::ToolConfig;
pub use coordinates::SkyPoint;
pub use query::resolve::{resolve_by_name, resolve_query, CoordinateInput, ResolvedQuery};
pub use query::{filter_by_radius, AnnotatedCatalog, AnnotatedRow};

/// Main error type for the firstfield library
#[derive(Debug, Error)]
pub enum FirstFieldError {
    #[error("No matching FIRST source found: {0}")]
    SourceNotFound(String),

    #[error("Catalog load failure: {0}")]
    LoadFailure(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Could not parse {input:?} as decimal degrees: {source}")]
    InputParseFailure {
        /// The text the operator supplied
        input: String,
        /// The underlying parse error
        source: ParseFloatError,
    },

    #[error("Input required: {0}")]
    InputRequired(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type for firstfield operations
pub type Result<T> = std::result::Result<T, FirstFieldError>;

/// Entry point for loading the FIRST catalog
pub struct Loader {
    data_dir: Option<PathBuf>,
}

impl Loader {
    /// Create a new loader that resolves catalog paths against the working directory
    pub fn new() -> Self {
        Self { data_dir: None }
    }

    /// Set a custom data directory
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Resolve a catalog file name against the data directory, if one is set
    pub fn resolve_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        match &self.data_dir {
            Some(dir) if path.as_ref().is_relative() => dir.join(path),
            _ => path.as_ref().to_path_buf(),
        }
    }

    /// Build a CSV loader for the FIRST catalog at `path`
    pub fn first_catalog<P: AsRef<Path>>(&self, path: P) -> catalogs::FirstCsvLoader {
        catalogs::FirstCsvLoader::new(self.resolve_path(path))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
