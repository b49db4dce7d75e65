//! Synthetic FIRST-like catalog generator
//!
//! Produces reproducible catalogs for tests and benchmarks: positions are
//! either uniform over the sphere or clustered around a point, fluxes follow
//! a log-uniform distribution, and classification codes are drawn from the
//! same three groups the plotting layer distinguishes.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

use super::{Catalog, CatalogRow};

/// Spatial distribution models for synthetic sources
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpatialDistribution {
    /// Uniform distribution across the entire sphere
    Uniform,
    /// Sources clustered around a specific point (degrees)
    Cluster {
        center_ra: f64,
        center_dec: f64,
        radius: f64,
    },
}

/// Configuration for synthetic catalog generation
#[derive(Debug, Clone)]
pub struct SyntheticCatalogConfig {
    /// Number of sources to generate
    pub count: usize,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Spatial distribution model
    pub spatial_dist: SpatialDistribution,
    /// Smallest integrated flux (mJy)
    pub min_flux: f64,
    /// Largest integrated flux (mJy)
    pub max_flux: f64,
}

impl Default for SyntheticCatalogConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed: 42,
            spatial_dist: SpatialDistribution::Uniform,
            min_flux: 0.5,
            max_flux: 500.0,
        }
    }
}

impl SyntheticCatalogConfig {
    /// Create a new synthetic catalog configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sources to generate
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the spatial distribution model
    pub fn with_spatial_distribution(mut self, dist: SpatialDistribution) -> Self {
        self.spatial_dist = dist;
        self
    }

    /// Set the flux range (mJy)
    pub fn with_flux_range(mut self, min: f64, max: f64) -> Self {
        self.min_flux = min;
        self.max_flux = max;
        self
    }

    /// Generate a synthetic catalog with the configured parameters
    pub fn generate(&self) -> Catalog {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let unit = Uniform::from(0.0..1.0);

        let rows = (0..self.count)
            .map(|i| {
                let (ra, dec) = self.generate_position(&mut rng);
                let flux = self.generate_flux(unit.sample(&mut rng));
                let class = match unit.sample(&mut rng) {
                    x if x < 0.3 => 'g',
                    x if x < 0.4 => 's',
                    _ => ' ',
                };
                CatalogRow::new(&format!("SYN{:07}", i), ra, dec, flux, class)
            })
            .collect();

        Catalog::from_rows(rows)
    }

    fn generate_position(&self, rng: &mut StdRng) -> (f64, f64) {
        let unit = Uniform::from(0.0..1.0);
        match self.spatial_dist {
            SpatialDistribution::Uniform => {
                // z uniform in [-1, 1] gives uniform density on the sphere
                let z: f64 = Uniform::from(-1.0..1.0).sample(rng);
                let phi: f64 = unit.sample(rng) * 2.0 * PI;
                (phi.to_degrees(), z.asin().to_degrees())
            }
            SpatialDistribution::Cluster {
                center_ra,
                center_dec,
                radius,
            } => {
                let sample: f64 = unit.sample(rng);
                let r = radius * sample.sqrt();
                let theta = unit.sample(rng) * 2.0 * PI;

                // Small-angle offset; RA offset stretched by 1/cos(dec)
                let cos_dec = center_dec.to_radians().cos().max(1e-6);
                let ra = (center_ra + r * theta.cos() / cos_dec).rem_euclid(360.0);
                let dec = (center_dec + r * theta.sin()).clamp(-90.0, 90.0);
                (ra, dec)
            }
        }
    }

    fn generate_flux(&self, sample: f64) -> f64 {
        let (lo, hi) = (self.min_flux.ln(), self.max_flux.ln());
        (lo + sample * (hi - lo)).exp()
    }
}

/// Generate `count` sources spread uniformly over the sky
pub fn create_synthetic_catalog(count: usize, seed: u64) -> Catalog {
    SyntheticCatalogConfig::new()
        .with_count(count)
        .with_seed(seed)
        .generate()
}
