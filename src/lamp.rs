//! Putting a lamp together and running a whole generation.

use crate::config::{FeatureMode, LampParameters, RunPaths};
use crate::coordinates::{
    project_constellations, project_stars, ConstellationObservation, ConstellationProjection,
    HorizontalTransform, ObserverContext, StarObservation,
};
use crate::diagnostics::{DiagnosticSink, Stage};
use crate::error::LampResult;
use crate::geometry::{star_bump, star_cutout, stick_figure, write_scad, Solid};
use crate::parse_stars::{load_catalog, load_constellations};
use nalgebra::Vector3;
use tracing::{info, warn};

/// a hollow sphere between `inner` and `outer`
pub fn shell(outer: f64, inner: f64) -> Solid {
    Solid::sphere(outer).difference(Solid::sphere(inner))
}

/// A block covering everything of a sphere of `radius` below
/// z = `cut_ratio * radius`, or None when that is below the sphere.
pub fn cut_off_slab(radius: f64, cut_ratio: f64) -> Option<Solid> {
    let cut_height = cut_ratio * radius;
    let margin = 1.0 + radius * 0.01;
    let floor = -radius - margin;
    if cut_height <= -radius {
        return None;
    }
    let side = 2.0 * (radius + margin);
    Some(
        Solid::cube(Vector3::new(side, side, cut_height - floor), false)
            .translate(Vector3::new(-side / 2.0, -side / 2.0, floor)),
    )
}

/// subtracts every feature from `body`; the order of `features` does not
/// change the resulting solid
pub fn carve(body: Solid, features: impl IntoIterator<Item = Solid>) -> Solid {
    features.into_iter().fold(body, Solid::difference)
}

/// adds every feature to `body`
pub fn attach(body: Solid, features: impl IntoIterator<Item = Solid>) -> Solid {
    features.into_iter().fold(body, Solid::union)
}

/// Builds the lamp solid for the visible stars and constellation segments.
///
/// Single layer: the whole shell is cut by stars and sticks. Two layers:
/// the outer half of the wall carries the sticks as channels, the inner
/// half (the mid-shell) only the star holes, so sticks do not go through.
pub fn assemble(
    params: &LampParameters,
    stars: &[StarObservation],
    constellations: &[ConstellationObservation],
) -> Solid {
    let r = params.shell_radius;
    let t = params.thickness;
    let sticks: Vec<Solid> = constellations
        .iter()
        .filter_map(|c| stick_figure(c, r, params.stick_breadth))
        .collect();

    let star_holes = || stars.iter().map(|s| star_cutout(s, r));
    let decorate = |body: Solid| {
        let body = match params.feature_mode {
            FeatureMode::Cut => carve(body, star_holes()),
            FeatureMode::Raised => attach(body, stars.iter().map(|s| star_bump(s, r, t))),
        };
        carve(body, sticks.iter().cloned())
    };

    let lamp = if params.two_layer {
        let mid = r - t / 2.0;
        let inner = match params.feature_mode {
            FeatureMode::Cut => carve(shell(mid, r - t), star_holes()),
            FeatureMode::Raised => shell(mid, r - t),
        };
        decorate(shell(r, mid)).union(inner)
    } else {
        decorate(shell(r, r - t))
    };

    match cut_off_slab(r, params.cut_ratio) {
        Some(slab) => lamp.difference(slab),
        None => lamp,
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub catalog_stars: usize,
    pub bright_stars: usize,
    pub visible_stars: usize,
    pub constellation_segments: usize,
    pub kept_segments: usize,
}

/// Reads the inputs, projects them for `observer`, writes diagnostics to
/// `sink` and the finished lamp to `paths.output`.
pub fn generate(
    params: &LampParameters,
    paths: &RunPaths,
    observer: &ObserverContext,
    transform: &dyn HorizontalTransform,
    sink: &mut dyn DiagnosticSink,
) -> LampResult<RunSummary> {
    let catalog = load_catalog(&paths.catalog)?;
    let segments = match &paths.constellations {
        Some(path) => load_constellations(path)?,
        None => vec![],
    };
    info!(stars = catalog.len(), segments = segments.len(), "inputs read");
    if catalog.is_empty() {
        warn!(path = %paths.catalog.display(), "catalog has no usable records, the lamp will have no stars");
    }

    let stars = project_stars(&catalog, observer, transform, &params.star_criteria());
    sink.record_stars(Stage::Raw, &stars.raw)?;
    sink.record_stars(Stage::Filtered, &stars.visible)?;

    let mut constellations = ConstellationProjection::default();
    if !segments.is_empty() {
        constellations =
            project_constellations(&segments, observer, transform, params.altitude_cutoff);
        sink.record_constellations(Stage::Raw, &constellations.raw)?;
        sink.record_constellations(Stage::Visible, &constellations.visible)?;
        sink.record_constellations(Stage::Filtered, &constellations.filtered)?;
    }

    let lamp = assemble(params, &stars.visible, &constellations.filtered);
    write_scad(&paths.output, params.segments, &lamp)?;

    Ok(RunSummary {
        catalog_stars: catalog.len(),
        bright_stars: stars.raw.len(),
        visible_stars: stars.visible.len(),
        constellation_segments: segments.len(),
        kept_segments: constellations.filtered.len(),
    })
}
