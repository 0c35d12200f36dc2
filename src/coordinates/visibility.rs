//! Picks the stars and stick figures that end up on the lamp.
//!
//! Both projections are pure: they take parsed inputs and return every
//! intermediate stage so that diagnostics can be written by the caller.

use crate::coordinates::horizontal::HorizontalTransform;
use crate::coordinates::observer::ObserverContext;
use crate::coordinates::{Equatorial, Horizontal};
use crate::parse_stars::{Catalog, ConstellationSegment, Star};
use std::collections::HashSet;
use tracing::{debug, warn};

/// radii that come out non-positive or non-finite are replaced by this
pub const MIN_STAR_RADIUS: f64 = 0.05;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StarCriteria {
    /// only stars with magnitude < threshold are used
    pub magnitude_threshold: f64,
    /// stars must be strictly above this altitude, degrees
    pub altitude_cutoff: f64,
    /// the display radius of a star exactly one magnitude below the threshold
    pub size_scale: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StarObservation {
    pub index: u32,
    pub azimuth: f64,
    pub altitude: f64,
    pub magnitude: f64,
    pub radius: f64,
}

impl StarObservation {
    pub fn horizontal(&self) -> Horizontal {
        Horizontal::new(self.azimuth, self.altitude)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationObservation {
    pub name: String,
    pub start: Horizontal,
    pub stop: Horizontal,
}

impl ConstellationObservation {
    /// both endpoints at or above the cutoff
    pub fn is_visible(&self, altitude_cutoff: f64) -> bool {
        self.start.altitude >= altitude_cutoff && self.stop.altitude >= altitude_cutoff
    }
}

#[derive(Debug, Clone, Default)]
pub struct StarProjection {
    /// every star under the magnitude threshold, before the altitude cut
    pub raw: Vec<StarObservation>,
    /// the stars above the altitude cutoff
    pub visible: Vec<StarObservation>,
}

#[derive(Debug, Clone, Default)]
pub struct ConstellationProjection {
    /// every segment of the input
    pub raw: Vec<ConstellationObservation>,
    /// segments with both endpoints visible
    pub visible: Vec<ConstellationObservation>,
    /// segments of constellations that are visible as a whole
    pub filtered: Vec<ConstellationObservation>,
}

/// stars brighter than the threshold, in ascending identifier order
pub fn select_bright(catalog: &Catalog, magnitude_threshold: f64) -> Vec<Star> {
    catalog
        .iter()
        .filter(|s| s.magnitude < magnitude_threshold)
        .copied()
        .collect()
}

/// `(threshold + 1 - magnitude) * size_scale / threshold`, unclamped
pub fn display_radius(magnitude: f64, magnitude_threshold: f64, size_scale: f64) -> f64 {
    (magnitude_threshold + 1.0 - magnitude) * size_scale / magnitude_threshold
}

/// returns the radius to use and whether it had to be clamped
pub fn clamp_radius(radius: f64) -> (f64, bool) {
    if radius.is_finite() && radius > 0.0 {
        (radius, false)
    } else {
        (MIN_STAR_RADIUS, true)
    }
}

/// Converts the bright stars of `catalog` to horizontal coordinates in one
/// batch and keeps those strictly above the altitude cutoff.
pub fn project_stars(
    catalog: &Catalog,
    observer: &ObserverContext,
    transform: &dyn HorizontalTransform,
    criteria: &StarCriteria,
) -> StarProjection {
    let bright = select_bright(catalog, criteria.magnitude_threshold);
    let positions: Vec<Equatorial> = bright.iter().map(Star::equatorial).collect();
    let horizontal = transform.to_horizontal(&positions, observer);
    debug_assert_eq!(horizontal.len(), bright.len());

    let mut clamped = 0usize;
    let raw: Vec<StarObservation> = bright
        .iter()
        .zip(horizontal)
        .map(|(star, h)| {
            let (radius, was_clamped) = clamp_radius(display_radius(
                star.magnitude,
                criteria.magnitude_threshold,
                criteria.size_scale,
            ));
            if was_clamped {
                clamped += 1;
            }
            StarObservation {
                index: star.index,
                azimuth: h.azimuth,
                altitude: h.altitude,
                magnitude: star.magnitude,
                radius,
            }
        })
        .collect();
    if clamped > 0 {
        warn!(
            clamped,
            min_radius = MIN_STAR_RADIUS,
            threshold = criteria.magnitude_threshold,
            "star radii were not positive and have been clamped"
        );
    }

    let visible: Vec<StarObservation> = raw
        .iter()
        .filter(|o| o.altitude > criteria.altitude_cutoff)
        .copied()
        .collect();
    debug!(bright = raw.len(), visible = visible.len(), "stars projected");
    StarProjection { raw, visible }
}

/// Converts every segment endpoint (one batch for the starts, one for the
/// stops) and keeps only constellations whose every segment has both
/// endpoints at or above the altitude cutoff.
pub fn project_constellations(
    segments: &[ConstellationSegment],
    observer: &ObserverContext,
    transform: &dyn HorizontalTransform,
    altitude_cutoff: f64,
) -> ConstellationProjection {
    let starts: Vec<Equatorial> = segments.iter().map(|s| s.start).collect();
    let stops: Vec<Equatorial> = segments.iter().map(|s| s.stop).collect();
    let starts = transform.to_horizontal(&starts, observer);
    let stops = transform.to_horizontal(&stops, observer);

    let raw: Vec<ConstellationObservation> = segments
        .iter()
        .zip(starts.into_iter().zip(stops))
        .map(|(seg, (start, stop))| ConstellationObservation {
            name: seg.name.clone(),
            start,
            stop,
        })
        .collect();

    let visible: Vec<ConstellationObservation> = raw
        .iter()
        .filter(|o| o.is_visible(altitude_cutoff))
        .cloned()
        .collect();

    let partly_hidden: HashSet<&str> = raw
        .iter()
        .filter(|o| !o.is_visible(altitude_cutoff))
        .map(|o| o.name.as_str())
        .collect();
    let filtered: Vec<ConstellationObservation> = visible
        .iter()
        .filter(|o| !partly_hidden.contains(o.name.as_str()))
        .cloned()
        .collect();

    debug!(
        segments = raw.len(),
        visible = visible.len(),
        kept = filtered.len(),
        dropped_constellations = partly_hidden.len(),
        "constellations projected"
    );
    ConstellationProjection {
        raw,
        visible,
        filtered,
    }
}
