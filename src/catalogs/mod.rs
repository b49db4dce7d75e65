//! FIRST source catalog module
//!
//! This module provides the in-memory representation of the FIRST catalog
//! and the loaders that produce it. A catalog is an ordered sequence of rows
//! with a fixed set of named fields plus any passthrough columns the source
//! file carries.

use serde::{Deserialize, Serialize};

use crate::coordinates::SkyPoint;
use crate::Result;

pub mod first;
pub mod synthetic;

pub use first::FirstCsvLoader;
pub use synthetic::{create_synthetic_catalog, SyntheticCatalogConfig};

/// Column holding the FIRST source identifier
pub const ID_COLUMN: &str = "FIRST";
/// Column holding right ascension (J2000, degrees)
pub const RA_COLUMN: &str = "RAJ2000";
/// Column holding declination (J2000, degrees)
pub const DEC_COLUMN: &str = "DEJ2000";
/// Column holding integrated flux density (mJy)
pub const FLUX_COLUMN: &str = "Fint";
/// Column holding the SDSS classification code
pub const CLASS_COLUMN: &str = "c1";

/// The fixed columns every FIRST catalog row carries, in catalog order
pub const FIXED_COLUMNS: [&str; 5] = [ID_COLUMN, RA_COLUMN, DEC_COLUMN, FLUX_COLUMN, CLASS_COLUMN];

/// A single FIRST catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    /// FIRST source identifier (e.g. "J223228.8+113152")
    pub id: String,
    /// Right ascension in degrees (epoch J2000)
    pub ra: f64,
    /// Declination in degrees (epoch J2000)
    pub dec: f64,
    /// Integrated flux density (mJy)
    pub flux: f64,
    /// SDSS classification code ('g' galaxy, 's' star, anything else unclassified)
    pub class: char,
    /// Passthrough values, parallel to [`Catalog::extra_columns`]
    pub extra: Vec<String>,
}

impl CatalogRow {
    /// Create a row with no passthrough fields
    pub fn new(id: &str, ra: f64, dec: f64, flux: f64, class: char) -> Self {
        Self {
            id: id.to_string(),
            ra,
            dec,
            flux,
            class,
            extra: Vec::new(),
        }
    }

    /// Sky position of this source
    pub fn position(&self) -> SkyPoint {
        SkyPoint::from_degrees(self.ra, self.dec)
    }

    /// Cell values for every column, fixed columns first
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.id.clone(),
            self.ra.to_string(),
            self.dec.to_string(),
            self.flux.to_string(),
            self.class.to_string(),
        ];
        cells.extend(self.extra.iter().cloned());
        cells
    }
}

/// An ordered FIRST catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
    extra_columns: Vec<String>,
}

impl Catalog {
    /// Create a catalog from rows that carry no passthrough fields
    pub fn from_rows(rows: Vec<CatalogRow>) -> Self {
        Self {
            rows,
            extra_columns: Vec::new(),
        }
    }

    /// Create a catalog with named passthrough columns
    pub fn with_extra_columns(rows: Vec<CatalogRow>, extra_columns: Vec<String>) -> Self {
        Self {
            rows,
            extra_columns,
        }
    }

    /// Rows in catalog order
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Names of the passthrough columns
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Names of every column, fixed columns first
    pub fn column_names(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|name| name.to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    /// Sky positions of every row, in catalog order
    pub fn positions(&self) -> Vec<SkyPoint> {
        self.rows.iter().map(CatalogRow::position).collect()
    }

    /// Get the number of rows in the catalog
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Something that can produce a fresh copy of the catalog for a query
pub trait CatalogLoader {
    /// Load the catalog. Failures are fatal for the query.
    fn load(&self) -> Result<Catalog>;
}

impl CatalogLoader for Catalog {
    fn load(&self) -> Result<Catalog> {
        Ok(self.clone())
    }
}
