//! Radius queries over the FIRST catalog
//!
//! [`filter_by_radius`] performs a full linear scan: the separation from the
//! query point to every row is computed in one vectorised pass, and the rows
//! strictly inside the radius are kept in catalog order with the separation
//! attached.

use serde::Serialize;

use crate::catalogs::{Catalog, CatalogRow};
use crate::coordinates::{separations, SkyPoint};

pub mod resolve;

/// Name of the derived separation column
pub const SEPARATION_COLUMN: &str = "Angular Separation";

/// A catalog row together with its distance from the query point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRow {
    row: CatalogRow,
    separation_deg: f64,
}

impl AnnotatedRow {
    /// The underlying catalog row
    pub fn row(&self) -> &CatalogRow {
        &self.row
    }

    /// Angular separation from the query point, in degrees
    pub fn separation_deg(&self) -> f64 {
        self.separation_deg
    }

    /// Cell values for every column, separation last
    pub fn cells(&self) -> Vec<String> {
        let mut cells = self.row.cells();
        cells.push(self.separation_deg.to_string());
        cells
    }
}

/// The rows of a catalog that fall inside a query radius
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedCatalog {
    center: SkyPoint,
    radius_deg: f64,
    column_names: Vec<String>,
    rows: Vec<AnnotatedRow>,
}

impl AnnotatedCatalog {
    /// Query point the separations were measured from
    pub fn center(&self) -> SkyPoint {
        self.center
    }

    /// Radius used for the query, in degrees
    pub fn radius_deg(&self) -> f64 {
        self.radius_deg
    }

    /// Catalog columns followed by [`SEPARATION_COLUMN`]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Retained rows in their current order
    pub fn rows(&self) -> &[AnnotatedRow] {
        &self.rows
    }

    /// Separation of every retained row, in current order
    pub fn separations(&self) -> Vec<f64> {
        self.rows.iter().map(AnnotatedRow::separation_deg).collect()
    }

    /// Get the number of retained rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows were retained
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sort nearest first. Ties keep their scan order.
    pub fn sort_by_separation(&mut self) {
        self.rows
            .sort_by(|a, b| a.separation_deg.total_cmp(&b.separation_deg));
    }

    /// Sort brightest first. Ties keep their scan order.
    pub fn sort_by_flux_descending(&mut self) {
        self.rows.sort_by(|a, b| b.row.flux.total_cmp(&a.row.flux));
    }
}

/// Find every catalog row strictly within `radius_deg` of `center`.
///
/// The boundary is exclusive: a row exactly `radius_deg` away is not
/// returned. The input catalog is left untouched and surviving rows keep
/// their catalog order. An empty result is not an error.
pub fn filter_by_radius(center: SkyPoint, catalog: &Catalog, radius_deg: f64) -> AnnotatedCatalog {
    let distances = separations(&center, &catalog.positions());

    let rows = catalog
        .rows()
        .iter()
        .zip(distances)
        .filter(|(_, separation)| *separation < radius_deg)
        .map(|(row, separation_deg)| AnnotatedRow {
            row: row.clone(),
            separation_deg,
        })
        .collect();

    let mut column_names = catalog.column_names();
    column_names.push(SEPARATION_COLUMN.to_string());

    AnnotatedCatalog {
        center,
        radius_deg,
        column_names,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::create_synthetic_catalog;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn id_list(result: &AnnotatedCatalog) -> Vec<&str> {
        result.rows().iter().map(|r| r.row().id.as_str()).collect()
    }

    // Sources around the origin, as in the FIRST tool's own fixture
    fn origin_catalog() -> Catalog {
        Catalog::from_rows(vec![
            CatalogRow::new("a", 0.086, -0.0798, 0.5, ' '),
            CatalogRow::new("b", 0.154, 0.100, 0.6, 'g'),
            CatalogRow::new("c", 0.127, -1.994, 0.2, 's'),
        ])
    }

    #[rstest]
    #[case(1.0, vec!["a", "b"])]
    #[case(2.0, vec!["a", "b", "c"])]
    #[case(0.1, vec![])]
    fn test_origin_fixture(#[case] radius: f64, #[case] expected: Vec<&str>) {
        let result = filter_by_radius(SkyPoint::from_degrees(0.0, 0.0), &origin_catalog(), radius);
        assert_eq!(id_list(&result), expected);
    }

    #[test]
    fn test_only_rows_inside_radius_are_annotated() {
        let catalog = Catalog::from_rows(vec![
            CatalogRow::new("far", 0.0, 1.5, 1.0, ' '),
            CatalogRow::new("near", 0.0, 0.5, 1.0, ' '),
            CatalogRow::new("farther", 0.0, 2.0, 1.0, ' '),
        ]);

        let result = filter_by_radius(SkyPoint::from_degrees(0.0, 0.0), &catalog, 1.0);
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0].row().id, "near");
        assert_relative_eq!(result.rows()[0].separation_deg(), 0.5, epsilon = 1e-12);
        assert_eq!(
            result.column_names(),
            &["FIRST", "RAJ2000", "DEJ2000", "Fint", "c1", "Angular Separation"]
        );
        assert_eq!(result.center(), SkyPoint::from_degrees(0.0, 0.0));
        assert_eq!(result.radius_deg(), 1.0);

        // Input is untouched
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let center = SkyPoint::from_degrees(10.0, 20.0);
        let catalog = Catalog::from_rows(vec![CatalogRow::new("edge", 10.0, 21.0, 1.0, ' ')]);

        let radius = center.separation(&catalog.rows()[0].position());
        assert!(filter_by_radius(center, &catalog, radius).is_empty());
        assert_eq!(filter_by_radius(center, &catalog, radius + 1e-9).len(), 1);
    }

    #[test]
    fn test_filter_keeps_scan_order() {
        let catalog = Catalog::from_rows(vec![
            CatalogRow::new("x", 0.0, 0.9, 1.0, ' '),
            CatalogRow::new("y", 0.0, 0.1, 1.0, ' '),
            CatalogRow::new("z", 0.0, 0.5, 1.0, ' '),
        ]);

        let result = filter_by_radius(SkyPoint::from_degrees(0.0, 0.0), &catalog, 1.0);
        assert_eq!(id_list(&result), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_ra_wraparound() {
        let catalog = Catalog::from_rows(vec![
            CatalogRow::new("east", 0.2, 0.0, 1.0, ' '),
            CatalogRow::new("west", 359.8, 0.0, 1.0, ' '),
            CatalogRow::new("opposite", 180.0, 0.0, 1.0, ' '),
        ]);

        let result = filter_by_radius(SkyPoint::from_degrees(0.0, 0.0), &catalog, 0.25);
        assert_eq!(id_list(&result), vec!["east", "west"]);
    }

    #[test]
    fn test_non_positive_radius_returns_nothing() {
        let catalog = origin_catalog();
        let center = SkyPoint::from_degrees(0.086, -0.0798);
        assert!(filter_by_radius(center, &catalog, 0.0).is_empty());
        assert!(filter_by_radius(center, &catalog, -1.0).is_empty());
        assert!(filter_by_radius(center, &catalog, f64::NAN).is_empty());
    }

    #[test]
    fn test_larger_radius_is_superset() {
        let catalog = create_synthetic_catalog(2000, 99);
        let center = SkyPoint::from_degrees(120.0, -30.0);

        let mut previous: Vec<String> = Vec::new();
        for radius in [5.0, 10.0, 20.0, 45.0, 90.0, 180.1] {
            let result = filter_by_radius(center, &catalog, radius);
            let ids: Vec<String> = result.rows().iter().map(|r| r.row().id.clone()).collect();
            assert!(previous.iter().all(|id| ids.contains(id)));
            assert!(result.separations().iter().all(|&s| s < radius));
            previous = ids;
        }
        assert_eq!(previous.len(), catalog.len());
    }

    #[test]
    fn test_sorting_helpers() {
        let catalog = Catalog::from_rows(vec![
            CatalogRow::new("a", 0.0, 0.3, 5.0, ' '),
            CatalogRow::new("b", 0.0, 0.1, 1.0, ' '),
            CatalogRow::new("c", 0.0, 0.2, 5.0, ' '),
            CatalogRow::new("d", 0.0, 0.4, 9.0, ' '),
        ]);
        let mut result = filter_by_radius(SkyPoint::from_degrees(0.0, 0.0), &catalog, 1.0);

        result.sort_by_separation();
        assert_eq!(id_list(&result), vec!["b", "c", "a", "d"]);

        result.sort_by_flux_descending();
        // a and c tie on flux and keep their previous relative order
        assert_eq!(id_list(&result), vec!["d", "c", "a", "b"]);

        let seps = result.separations();
        assert_relative_eq!(seps[0], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_flux_sort_tolerates_nan() {
        let rows = (0..40)
            .map(|i| {
                let flux = if i % 3 == 0 { f64::NAN } else { i as f64 };
                CatalogRow::new(&format!("r{}", i), 0.0, i as f64 * 0.01, flux, ' ')
            })
            .collect();
        let catalog = Catalog::from_rows(rows);
        let mut result = filter_by_radius(SkyPoint::from_degrees(0.0, 0.0), &catalog, 1.0);
        assert_eq!(result.len(), 40);

        result.sort_by_flux_descending();
        assert_eq!(result.len(), 40);

        let finite: Vec<f64> = result
            .rows()
            .iter()
            .map(|r| r.row().flux)
            .filter(|f| f.is_finite())
            .collect();
        assert_eq!(finite.len(), 26);
        assert!(finite.windows(2).all(|w| w[0] >= w[1]));
    }
}
