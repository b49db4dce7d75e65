//! Sky positions and great-circle separations
//!
//! Positions are kept in degrees, the unit the FIRST catalog is published in.
//! Separations are computed on unit vectors so that they stay well defined
//! near the poles and across the 0°/360° right ascension wrap.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{FirstFieldError, Result};

/// Equatorial position on the sky (J2000), in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPoint {
    ra: f64,
    dec: f64,
}

impl SkyPoint {
    /// Create a new sky position from right ascension and declination in degrees.
    ///
    /// Right ascension is wrapped into [0, 360).
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        let ra = ra_deg.rem_euclid(360.0);
        let ra = if ra >= 360.0 { 0.0 } else { ra };
        Self { ra, dec: dec_deg }
    }

    /// Create a sky position, rejecting values that do not name a point on the sky.
    ///
    /// Both angles must be finite and the declination must lie in [-90, 90].
    pub fn try_from_degrees(ra_deg: f64, dec_deg: f64) -> Result<Self> {
        Ok(Self::from_degrees(validate_ra(ra_deg)?, validate_dec(dec_deg)?))
    }

    /// Get right ascension in degrees
    pub fn ra_deg(&self) -> f64 {
        self.ra
    }

    /// Get declination in degrees
    pub fn dec_deg(&self) -> f64 {
        self.dec
    }

    /// Convert RA/Dec to a unit vector in ICRS coordinates
    pub fn unit_vector(&self) -> Vector3<f64> {
        let ra_rad = self.ra.to_radians();
        let dec_rad = self.dec.to_radians();

        Vector3::new(
            dec_rad.cos() * ra_rad.cos(),
            dec_rad.cos() * ra_rad.sin(),
            dec_rad.sin(),
        )
    }

    /// Angular distance to another position, in degrees
    pub fn separation(&self, other: &SkyPoint) -> f64 {
        angular_separation(self, other)
    }
}

/// Accept any finite right ascension; it is wrapped later
pub fn validate_ra(ra_deg: f64) -> Result<f64> {
    if ra_deg.is_finite() {
        Ok(ra_deg)
    } else {
        Err(FirstFieldError::InvalidCoordinate(format!(
            "right ascension {} is not a finite number",
            ra_deg
        )))
    }
}

/// Accept a declination in [-90, 90]
pub fn validate_dec(dec_deg: f64) -> Result<f64> {
    if (-90.0..=90.0).contains(&dec_deg) {
        Ok(dec_deg)
    } else {
        Err(FirstFieldError::InvalidCoordinate(format!(
            "declination {} is outside [-90, 90]",
            dec_deg
        )))
    }
}

/// Great-circle separation between two sky positions, in degrees.
///
/// Uses `atan2(|a × b|, a · b)`, which keeps full precision for both very
/// small and nearly antipodal separations where `acos` of the dot product
/// does not.
pub fn angular_separation(a: &SkyPoint, b: &SkyPoint) -> f64 {
    separation_from_vectors(&a.unit_vector(), &b.unit_vector())
}

/// Separations from `center` to every point, in input order
pub fn separations(center: &SkyPoint, points: &[SkyPoint]) -> Vec<f64> {
    let reference = center.unit_vector();
    points
        .iter()
        .map(|point| separation_from_vectors(&reference, &point.unit_vector()))
        .collect()
}

fn separation_from_vectors(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let sin_angle = a.cross(b).norm();
    let cos_angle = a.dot(b);
    sin_angle.atan2(cos_angle).to_degrees()
}
