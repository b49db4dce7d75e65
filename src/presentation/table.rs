//! HTML table output, nearest source first

use log::info;
use std::path::{Path, PathBuf};

use super::{escape_html, run_query, write_artifact, QueryOutcome, QueryRequest};
use crate::catalogs::CatalogLoader;
use crate::query::resolve::CoordinateInput;
use crate::query::AnnotatedCatalog;
use crate::Result;

/// File name of the table artifact
pub const TABLE_FILE_NAME: &str = "table.html";

/// Result of a table query: the sorted rows and where they were written
#[derive(Debug, Clone)]
pub struct TableReport {
    pub outcome: QueryOutcome,
    pub path: PathBuf,
}

/// Render the annotated catalog as a standalone HTML document
pub fn render_html(results: &AnnotatedCatalog, caption: &str) -> String {
    let mut html = String::new();
    html.push_str("<html>\n <head>\n  <meta charset=\"utf-8\"/>\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(caption)));
    html.push_str(" </head>\n <body>\n  <table>\n");
    html.push_str(&format!("   <caption>{}</caption>\n", escape_html(caption)));

    html.push_str("   <thead>\n    <tr>\n");
    for name in results.column_names() {
        html.push_str(&format!("     <th>{}</th>\n", escape_html(name)));
    }
    html.push_str("    </tr>\n   </thead>\n");

    for row in results.rows() {
        html.push_str("   <tr>\n");
        for cell in row.cells() {
            html.push_str(&format!("    <td>{}</td>\n", escape_html(&cell)));
        }
        html.push_str("   </tr>\n");
    }

    html.push_str("  </table>\n");
    html.push_str(&format!(
        "  <p>{} sources. Generated {}</p>\n",
        results.len(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    html.push_str(" </body>\n</html>\n");
    html
}

/// Run a query, sort by angular separation and write `table.html` into `output_dir`
pub fn run_table_query(
    loader: &dyn CatalogLoader,
    request: &QueryRequest,
    input: &mut dyn CoordinateInput,
    output_dir: &Path,
) -> Result<TableReport> {
    let mut outcome = run_query(loader, request, input)?;
    outcome.results.sort_by_separation();

    let caption = format!(
        "FIRST sources within a {} degree radius of {}",
        request.radius_deg,
        outcome.query.search_term()
    );
    let html = render_html(&outcome.results, &caption);
    let path = write_artifact(output_dir, TABLE_FILE_NAME, &html)?;
    info!("Wrote {} rows to {}", outcome.results.len(), path.display());

    Ok(TableReport { outcome, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::{Catalog, CatalogRow};
    use crate::coordinates::SkyPoint;
    use crate::query::filter_by_radius;
    use crate::query::resolve::{Axis, NoInput};
    use tempfile::tempdir;

    fn catalog() -> Catalog {
        Catalog::from_rows(vec![
            CatalogRow::new("far", 338.12, 12.33, 1.0, ' '),
            CatalogRow::new("near", 338.12, 11.63, 5.0, 'g'),
            CatalogRow::new("J<odd>&", 338.12, 11.93, 2.0, 's'),
            CatalogRow::new("outside", 200.0, 11.53, 2.0, 's'),
        ])
    }

    #[test]
    fn test_render_html_lists_columns_and_rows() {
        let results = filter_by_radius(SkyPoint::from_degrees(338.12, 11.53), &catalog(), 1.0);
        let html = render_html(&results, "test caption");

        assert!(html.contains("<th>FIRST</th>"));
        assert!(html.contains("<th>Angular Separation</th>"));
        assert!(html.contains("<td>near</td>"));
        assert!(html.contains("<td>J&lt;odd&gt;&amp;</td>"));
        assert!(!html.contains("outside"));
        assert!(html.contains("<caption>test caption</caption>"));
        assert_eq!(html.matches("\n   <tr>\n").count(), 3);
    }

    #[test]
    fn test_run_table_query_sorts_by_separation() {
        let temp_dir = tempdir().unwrap();
        let request = QueryRequest {
            ra: Some(338.12),
            dec: Some(11.53),
            source: None,
            radius_deg: 1.0,
        };

        let report =
            run_table_query(&catalog(), &request, &mut NoInput, temp_dir.path()).unwrap();

        let ids: Vec<&str> = report
            .outcome
            .results
            .rows()
            .iter()
            .map(|r| r.row().id.as_str())
            .collect();
        assert_eq!(ids, vec!["near", "J<odd>&", "far"]);

        assert_eq!(report.path, temp_dir.path().join(TABLE_FILE_NAME));
        let html = std::fs::read_to_string(&report.path).unwrap();
        let near = html.find("<td>near</td>").unwrap();
        let far = html.find("<td>far</td>").unwrap();
        assert!(near < far);
        assert!(html.contains("radius of 338.12 11.53"));
    }

    #[test]
    fn test_failed_input_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let request = QueryRequest {
            ra: None,
            dec: None,
            source: Some("missing".to_string()),
            radius_deg: 1.0,
        };

        let mut input = |_axis: Axis| -> Result<f64> {
            Err(crate::FirstFieldError::InputRequired("test".to_string()))
        };
        assert!(run_table_query(&catalog(), &request, &mut input, temp_dir.path()).is_err());
        assert!(!temp_dir.path().join(TABLE_FILE_NAME).exists());
    }
}
