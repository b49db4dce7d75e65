//! Table and plot front ends for radius queries
//!
//! Both front ends run the same pipeline: load the catalog, resolve the
//! query point, filter by radius. They differ only in their default radius,
//! the order they sort the result into, and the artifact they write.
//! Every artifact is rendered in memory first, so a failure anywhere in the
//! pipeline leaves nothing half-written on disk.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalogs::CatalogLoader;
use crate::query::resolve::{resolve_query, CoordinateInput, ResolvedQuery};
use crate::query::{filter_by_radius, AnnotatedCatalog};
use crate::Result;

pub mod plot;
pub mod table;

pub use plot::{run_plot_query, PlotReport};
pub use table::{run_table_query, TableReport};

/// What the operator asked for
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Explicit right ascension (degrees)
    pub ra: Option<f64>,
    /// Explicit declination (degrees)
    pub dec: Option<f64>,
    /// FIRST source to centre the search on
    pub source: Option<String>,
    /// Search radius (degrees)
    pub radius_deg: f64,
}

/// A resolved query and the catalog rows inside its radius
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: ResolvedQuery,
    pub results: AnnotatedCatalog,
}

/// Load the catalog once, resolve the query point, and filter by radius
pub fn run_query(
    loader: &dyn CatalogLoader,
    request: &QueryRequest,
    input: &mut dyn CoordinateInput,
) -> Result<QueryOutcome> {
    let catalog = loader.load()?;
    let query = resolve_query(
        &catalog,
        request.ra,
        request.dec,
        request.source.as_deref(),
        input,
    )?;

    info!(
        "Finding FIRST sources within a {} degree radius of {}",
        request.radius_deg,
        query.search_term()
    );

    let results = filter_by_radius(query.center, &catalog, request.radius_deg);
    info!("Found {} of {} sources", results.len(), catalog.len());

    Ok(QueryOutcome { query, results })
}

/// Write a rendered artifact, creating the output directory if needed
pub(crate) fn write_artifact(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Escape text for inclusion in HTML
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
