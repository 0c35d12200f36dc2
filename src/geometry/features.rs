//! Star holes, star bumps and constellation sticks.
//!
//! All features share one convention for turning a direction in the sky
//! into an orientation: a solid built along +z is tipped by (90 - altitude)
//! about y and then turned by the azimuth about z. That sends +z to
//! `Horizontal::to_cartesian`, which is also what the sticks are built from.

use crate::coordinates::{ConstellationObservation, Horizontal, StarObservation};
use crate::geometry::solid::Solid;
use nalgebra::{Point2, Vector3};
use tracing::warn;

/// relative to the shell radius, below this two projected y values are equal
pub const SLOPE_EPSILON: f64 = 1e-9;

/// the rotate() angles that point +z at `direction`
pub fn orientation(direction: &Horizontal) -> Vector3<f64> {
    Vector3::new(0.0, 90.0 - direction.altitude, direction.azimuth)
}

/// A cylinder from the centre of the shell out to its surface, to be
/// subtracted.
pub fn star_cutout(star: &StarObservation, shell_radius: f64) -> Solid {
    Solid::cylinder(star.radius, shell_radius).rotate(orientation(&star.horizontal()))
}

/// A short cylinder standing proud of the outer surface, to be added. It
/// starts at the inner surface so it fuses with the shell.
pub fn star_bump(star: &StarObservation, shell_radius: f64, thickness: f64) -> Solid {
    Solid::cylinder(star.radius, thickness * 1.5)
        .translate(Vector3::new(0.0, 0.0, shell_radius - thickness))
        .rotate(orientation(&star.horizontal()))
}

/// The four corners of a stick straddling the xy projection of a segment
/// on a sphere of radius `shell_radius`, each corner `breadth` away from
/// its endpoint: near-left, near-right, far-right, far-left.
///
/// Returns None for a segment whose projection has no length.
pub fn stick_outline(
    start: &Horizontal,
    stop: &Horizontal,
    shell_radius: f64,
    breadth: f64,
) -> Option<[Point2<f64>; 4]> {
    let p1 = start.to_cartesian(shell_radius);
    let p2 = stop.to_cartesian(shell_radius);
    let (x1, y1, x2, y2) = (p1.x, p1.y, p2.x, p2.y);
    let eps = SLOPE_EPSILON * shell_radius.abs().max(1.0);

    if (y2 - y1).abs() < eps {
        if (x2 - x1).abs() < eps {
            return None;
        }
        // parallel to x, so the perpendicular is parallel to y
        return Some([
            Point2::new(x1, y1 - breadth),
            Point2::new(x1, y1 + breadth),
            Point2::new(x2, y2 + breadth),
            Point2::new(x2, y2 - breadth),
        ]);
    }

    // slope of the perpendicular, not of the segment
    let m = -(x2 - x1) / (y2 - y1);
    let dx = (breadth * breadth / (m * m + 1.0)).sqrt();
    let offset = |x: f64, y: f64, d: f64| Point2::new(x + d, y + m * d);
    Some([
        offset(x1, y1, -dx),
        offset(x1, y1, dx),
        offset(x2, y2, dx),
        offset(x2, y2, -dx),
    ])
}

/// The stick for one segment, extruded up to the shell radius, or None
/// (with a warning) when the segment is degenerate.
pub fn stick_figure(segment: &ConstellationObservation, shell_radius: f64, breadth: f64) -> Option<Solid> {
    match stick_outline(&segment.start, &segment.stop, shell_radius, breadth) {
        Some(corners) => Some(Solid::extrude(corners.to_vec(), shell_radius)),
        None => {
            warn!(
                constellation = %segment.name,
                azimuth = segment.start.azimuth,
                altitude = segment.start.altitude,
                "segment has no length when projected, skipped"
            );
            None
        }
    }
}
