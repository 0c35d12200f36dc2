//! Sky coordinates: from catalog positions to what an observer sees.
//!
//! `Equatorial` positions come out of the parsers, a `HorizontalTransform`
//! turns them into `Horizontal` positions for one observer and instant, and
//! `visibility` decides which of them make it onto the lamp.
pub mod horizontal;
pub mod observer;
pub mod visibility;
#[cfg(test)]
mod tests;

use nalgebra::Vector3;

pub use horizontal::{HorizontalTransform, MeanSiderealTransform};
pub use observer::{Location, ObserverContext};
pub use visibility::{
    project_constellations, project_stars, ConstellationObservation, ConstellationProjection,
    StarCriteria, StarObservation,
};

/// right ascension and declination, both in degrees
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Equatorial {
    pub ra: f64,
    pub dec: f64,
}

impl Equatorial {
    pub fn new(ra: f64, dec: f64) -> Equatorial {
        Equatorial { ra, dec }
    }
}

/// azimuth (from north through east, [0, 360)) and altitude above the
/// horizon ([-90, 90]), both in degrees
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Horizontal {
    pub azimuth: f64,
    pub altitude: f64,
}

impl Horizontal {
    pub fn new(azimuth: f64, altitude: f64) -> Horizontal {
        Horizontal { azimuth, altitude }
    }

    /// the point in this direction on a sphere of the given radius, z up,
    /// x towards azimuth 0 and y towards azimuth 90
    pub fn to_cartesian(&self, radius: f64) -> Vector3<f64> {
        let (az, alt) = (self.azimuth.to_radians(), self.altitude.to_radians());
        Vector3::new(
            radius * alt.cos() * az.cos(),
            radius * alt.cos() * az.sin(),
            radius * alt.sin(),
        )
    }
}
