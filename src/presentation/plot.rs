//! Scatter plot output, brightest source first
//!
//! Sources are drawn as translucent circles whose area follows integrated
//! flux, coloured by SDSS classification. Drawing the brightest sources
//! first keeps the way markers overlap consistent between runs.

use log::{info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use super::{escape_html, run_query, write_artifact, QueryOutcome, QueryRequest};
use crate::catalogs::CatalogLoader;
use crate::query::resolve::{CoordinateInput, ResolvedQuery};
use crate::query::AnnotatedCatalog;
use crate::{FirstFieldError, Result};

type PlotResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// File name of the HTML document wrapping the plot image
pub const PLOT_FILE_NAME: &str = "plot.html";

pub const X_LABEL: &str = "Right Ascension (degree)";
pub const Y_LABEL: &str = "Declination (degree)";
pub const LEGEND_TITLE: &str = "SDSS Classification";

const PLOT_SIZE: (u32, u32) = (800, 600);

/// Marker colour and legend label for a classification group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassStyle {
    pub color: RGBColor,
    pub label: &'static str,
}

const GALAXY: ClassStyle = ClassStyle {
    color: RED,
    label: "galaxy",
};
const STAR: ClassStyle = ClassStyle {
    color: GREEN,
    label: "star",
};
const OTHER: ClassStyle = ClassStyle {
    color: BLUE,
    label: "other",
};

/// The three legend entries, in legend order
pub const CLASS_STYLES: [ClassStyle; 3] = [GALAXY, STAR, OTHER];

/// Map an SDSS classification code onto its plot style
pub fn class_style(class: char) -> ClassStyle {
    match class {
        'g' => GALAXY,
        's' => STAR,
        _ => OTHER,
    }
}

/// Result of a plot query: the sorted rows and the files written
#[derive(Debug, Clone)]
pub struct PlotReport {
    pub outcome: QueryOutcome,
    pub title: String,
    pub image_path: PathBuf,
    pub html_path: PathBuf,
}

/// Plot title, e.g. "FIRST Sources within 0.25° of 338.12° 11.53°"
pub fn plot_title(query: &ResolvedQuery, radius_deg: f64) -> String {
    let term = match &query.source {
        Some(name) => name.clone(),
        None => format!(
            "{:.2}\u{b0} {:.2}\u{b0}",
            query.center.ra_deg(),
            query.center.dec_deg()
        ),
    };
    format!("FIRST Sources within {}\u{b0} of {}", radius_deg, term)
}

/// Image file name keyed by the query, e.g. "fig_338.12_11.53_0.25.svg"
pub fn image_file_name(query: &ResolvedQuery, radius_deg: f64) -> String {
    format!(
        "fig_{}_{}_{}.svg",
        query.center.ra_deg(),
        query.center.dec_deg(),
        radius_deg
    )
}

/// HTML document that displays the plot image
pub fn wrapper_html(image_name: &str) -> String {
    format!(
        "<html><head><title>FIRST Source Query</title></head><img src=\"{}\"></html>",
        escape_html(image_name)
    )
}

/// Right ascension unwrapped onto the side of the wrap nearest `center_ra`
fn unwrap_ra(ra: f64, center_ra: f64) -> f64 {
    let mut offset = (ra - center_ra).rem_euclid(360.0);
    if offset > 180.0 {
        offset -= 360.0;
    }
    center_ra + offset
}

/// Plot bounds: the bounding box of the search circle
fn plot_ranges(results: &AnnotatedCatalog) -> ((f64, f64), (f64, f64)) {
    let center = results.center();
    let radius = results.radius_deg().max(1e-6);
    let cos_dec = center.dec_deg().to_radians().cos().max(1e-6);
    let half_width = (radius / cos_dec).min(180.0);
    (
        (center.ra_deg() - half_width, center.ra_deg() + half_width),
        (
            (center.dec_deg() - radius).max(-90.0),
            (center.dec_deg() + radius).min(90.0),
        ),
    )
}

/// Marker radius in pixels; marker area grows linearly with flux
fn marker_radius(flux: f64) -> f64 {
    flux.max(0.0).sqrt().clamp(1.0, 40.0)
}

fn draw_scatter(
    root: &DrawingArea<SVGBackend, Shift>,
    results: &AnnotatedCatalog,
    title: &str,
) -> PlotResult {
    let (x_range, y_range) = plot_ranges(results);
    let center_ra = results.center().ra_deg();

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;
    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .draw()?;

    chart.draw_series(results.rows().iter().map(|annotated| {
        let row = annotated.row();
        let style = class_style(row.class);
        Circle::new(
            (unwrap_ra(row.ra, center_ra), row.dec),
            marker_radius(row.flux),
            style.color.mix(0.5).filled(),
        )
    }))?;

    // Legend-only series: a title line followed by one entry per class
    chart
        .draw_series(std::iter::empty::<Circle<(f64, f64), f64>>())?
        .label(LEGEND_TITLE)
        .legend(|(x, y)| Circle::new((x, y), 0, WHITE.filled()));
    for style in CLASS_STYLES {
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), f64>>())?
            .label(style.label)
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, style.color.mix(0.5).filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render the scatter plot to an SVG document in memory
pub fn render_svg(results: &AnnotatedCatalog, title: &str) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PLOT_SIZE).into_drawing_area();
        draw_scatter(&root, results, title)
            .map_err(|e| FirstFieldError::RenderError(e.to_string()))?;
    }
    Ok(svg)
}

/// Run a query, sort by flux (largest first), and write the plot image and
/// its HTML wrapper into `output_dir`
pub fn run_plot_query(
    loader: &dyn CatalogLoader,
    request: &QueryRequest,
    input: &mut dyn CoordinateInput,
    output_dir: &Path,
) -> Result<PlotReport> {
    let mut outcome = run_query(loader, request, input)?;
    outcome.results.sort_by_flux_descending();

    let title = plot_title(&outcome.query, request.radius_deg);
    let svg = render_svg(&outcome.results, &title)?;
    let image_name = image_file_name(&outcome.query, request.radius_deg);
    let html = wrapper_html(&image_name);

    let image_path = write_artifact(output_dir, &image_name, &svg)?;
    let html_path = match write_artifact(output_dir, PLOT_FILE_NAME, &html) {
        Ok(path) => path,
        Err(e) => {
            // The image alone is not a usable result
            if let Err(remove_err) = fs::remove_file(&image_path) {
                warn!("Could not remove {}: {}", image_path.display(), remove_err);
            }
            return Err(e);
        }
    };
    info!("Wrote plot of {} sources to {}", outcome.results.len(), image_path.display());

    Ok(PlotReport {
        outcome,
        title,
        image_path,
        html_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::{Catalog, CatalogRow};
    use crate::coordinates::SkyPoint;
    use crate::query::filter_by_radius;
    use crate::query::resolve::NoInput;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn origin_catalog() -> Catalog {
        Catalog::from_rows(vec![
            CatalogRow::new("a", 0.086, -0.0798, 0.5, ' '),
            CatalogRow::new("b", 0.154, 0.100, 0.6, 'g'),
            CatalogRow::new("c", 0.127, -1.994, 0.2, 's'),
            CatalogRow::new("d", 359.95, 0.01, 0.9, 's'),
        ])
    }

    fn coordinate_query(ra: f64, dec: f64) -> ResolvedQuery {
        ResolvedQuery {
            center: SkyPoint::from_degrees(ra, dec),
            source: None,
        }
    }

    #[test]
    fn test_plot_titles() {
        assert_eq!(
            plot_title(&coordinate_query(0.0, -1.0), 0.25),
            "FIRST Sources within 0.25° of 0.00° -1.00°"
        );
        assert_eq!(
            plot_title(&coordinate_query(338.12, 11.53), 1.0),
            "FIRST Sources within 1° of 338.12° 11.53°"
        );
        let named = ResolvedQuery {
            center: SkyPoint::from_degrees(4.0, 5.0),
            source: Some("TestObjectName".to_string()),
        };
        assert_eq!(
            plot_title(&named, 0.25),
            "FIRST Sources within 0.25° of TestObjectName"
        );
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            image_file_name(&coordinate_query(338.12, 11.53), 0.25),
            "fig_338.12_11.53_0.25.svg"
        );
        assert_eq!(
            wrapper_html("fig_0_-1_0.25.svg"),
            "<html><head><title>FIRST Source Query</title></head><img src=\"fig_0_-1_0.25.svg\"></html>"
        );
    }

    #[test]
    fn test_class_styles() {
        assert_eq!(class_style('g').label, "galaxy");
        assert_eq!(class_style('g').color, RED);
        assert_eq!(class_style('s').label, "star");
        assert_eq!(class_style('s').color, GREEN);
        assert_eq!(class_style(' ').label, "other");
        assert_eq!(class_style('x').color, BLUE);
    }

    #[test]
    fn test_unwrap_ra_and_marker_radius() {
        assert_relative_eq!(unwrap_ra(359.95, 0.0), -0.05, epsilon = 1e-9);
        assert_relative_eq!(unwrap_ra(0.05, 359.9), 360.05, epsilon = 1e-9);
        assert_relative_eq!(unwrap_ra(10.0, 12.0), 10.0, epsilon = 1e-9);

        assert_eq!(marker_radius(100.0), 10.0);
        assert_eq!(marker_radius(0.2), 1.0);
        assert_eq!(marker_radius(1e6), 40.0);
    }

    #[test]
    fn test_render_svg() {
        let results = filter_by_radius(SkyPoint::from_degrees(0.0, 0.0), &origin_catalog(), 0.25);
        let svg = render_svg(&results, "FIRST Sources within 0.25° of 0.00° 0.00°").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<circle"));

        // Nothing found still renders an empty chart
        let empty = filter_by_radius(SkyPoint::from_degrees(180.0, 45.0), &origin_catalog(), 0.25);
        assert!(render_svg(&empty, "empty").unwrap().contains("<svg"));
    }

    #[test]
    fn test_run_plot_query_writes_artifacts() {
        let temp_dir = tempdir().unwrap();
        let request = QueryRequest {
            ra: Some(0.0),
            dec: Some(0.0),
            source: None,
            radius_deg: 2.0,
        };

        let report =
            run_plot_query(&origin_catalog(), &request, &mut NoInput, temp_dir.path()).unwrap();

        let fluxes: Vec<f64> = report
            .outcome
            .results
            .rows()
            .iter()
            .map(|r| r.row().flux)
            .collect();
        assert_eq!(fluxes, vec![0.9, 0.6, 0.5, 0.2]);

        assert_eq!(report.title, "FIRST Sources within 2° of 0.00° 0.00°");
        assert_eq!(report.image_path, temp_dir.path().join("fig_0_0_2.svg"));
        assert!(report.image_path.exists());

        let html = std::fs::read_to_string(&report.html_path).unwrap();
        assert!(html.contains("src=\"fig_0_0_2.svg\""));
    }

    #[test]
    fn test_failed_wrapper_write_removes_image() {
        let temp_dir = tempdir().unwrap();
        // A directory in the way of plot.html makes the wrapper write fail
        std::fs::create_dir(temp_dir.path().join(PLOT_FILE_NAME)).unwrap();

        let request = QueryRequest {
            ra: Some(0.0),
            dec: Some(0.0),
            source: None,
            radius_deg: 2.0,
        };
        let result = run_plot_query(&origin_catalog(), &request, &mut NoInput, temp_dir.path());

        assert!(matches!(result, Err(FirstFieldError::IoError(_))));
        assert!(!temp_dir.path().join("fig_0_0_2.svg").exists());
    }
}
