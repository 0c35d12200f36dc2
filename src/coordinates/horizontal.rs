//! Equatorial to horizontal conversion.
//!
//! The lamp only needs "where is this star in my sky", so the conversion
//! sits behind a trait. The built-in implementation uses mean sidereal time
//! and plain spherical trigonometry: no precession, nutation, aberration or
//! refraction. That is good to a fraction of a degree for current dates,
//! which is well below the size of a hole in a printed shell.

use crate::coordinates::observer::ObserverContext;
use crate::coordinates::{Equatorial, Horizontal};
use chrono::{DateTime, TimeZone, Utc};

pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;
pub const GMST_BASE_DEG: f64 = 280.46061837;
pub const GMST_ROTATION_PER_DAY: f64 = 360.98564736629;
pub const GMST_CORRECTION: f64 = 0.000387933;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Converts a batch of catalog positions for one observer and instant.
///
/// Implementations must return exactly one `Horizontal` per input, in input
/// order. Callers hand over everything they need converted in a single call.
pub trait HorizontalTransform {
    fn to_horizontal(&self, positions: &[Equatorial], observer: &ObserverContext) -> Vec<Horizontal>;
}

#[derive(Debug, Default, Copy, Clone)]
pub struct MeanSiderealTransform;

impl HorizontalTransform for MeanSiderealTransform {
    fn to_horizontal(&self, positions: &[Equatorial], observer: &ObserverContext) -> Vec<Horizontal> {
        let lst = local_sidereal_time(observer);
        let lat = observer.location.latitude.to_radians();
        positions
            .iter()
            .map(|p| equatorial_to_horizontal(p, lst, lat))
            .collect()
    }
}

fn j2000() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
}

/// Greenwich mean sidereal time in degrees, [0, 360)
pub fn greenwich_mean_sidereal_time(timestamp: DateTime<Utc>) -> f64 {
    let days_since_j2000 =
        (timestamp - j2000()).num_milliseconds() as f64 / (1000.0 * SECONDS_PER_DAY);
    let centuries = days_since_j2000 / DAYS_PER_JULIAN_CENTURY;
    let gmst_degrees = GMST_BASE_DEG
        + GMST_ROTATION_PER_DAY * days_since_j2000
        + GMST_CORRECTION * centuries * centuries
        - centuries * centuries * centuries / 38710000.0;
    normalize_degrees(gmst_degrees)
}

/// local mean sidereal time in degrees, [0, 360)
pub fn local_sidereal_time(observer: &ObserverContext) -> f64 {
    normalize_degrees(greenwich_mean_sidereal_time(observer.time) + observer.location.longitude)
}

/// `lst` in degrees, `lat` in radians
fn equatorial_to_horizontal(p: &Equatorial, lst: f64, lat: f64) -> Horizontal {
    let hour_angle = (lst - p.ra).to_radians();
    let dec = p.dec.to_radians();

    let sin_alt = dec.sin() * lat.sin() + dec.cos() * lat.cos() * hour_angle.cos();
    let altitude = sin_alt.clamp(-1.0, 1.0).asin();

    let y = -hour_angle.sin() * dec.cos();
    let x = dec.sin() * lat.cos() - dec.cos() * lat.sin() * hour_angle.cos();
    let azimuth = normalize_degrees(y.atan2(x).to_degrees());

    Horizontal::new(azimuth, altitude.to_degrees())
}

/// folds an angle into [0, 360); rem_euclid alone can round up to 360
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}
