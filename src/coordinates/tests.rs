use super::horizontal::{greenwich_mean_sidereal_time, local_sidereal_time, GMST_BASE_DEG};
use super::visibility::{clamp_radius, display_radius, select_bright, MIN_STAR_RADIUS};
use super::*;
use crate::parse_stars::{Catalog, ConstellationSegment, Star};
use approx::assert_relative_eq;
use chrono::{Duration, TimeZone, Utc};
use rand::Rng;
use std::cell::Cell;

/// treats ra as azimuth and dec as altitude, and counts how often it is asked
#[derive(Default)]
struct IdentityTransform {
    calls: Cell<usize>,
}

impl HorizontalTransform for IdentityTransform {
    fn to_horizontal(&self, positions: &[Equatorial], _: &ObserverContext) -> Vec<Horizontal> {
        self.calls.set(self.calls.get() + 1);
        positions
            .iter()
            .map(|p| Horizontal::new(p.ra, p.dec))
            .collect()
    }
}

fn observer_at(latitude: f64, longitude: f64) -> ObserverContext {
    ObserverContext::new(
        Location::new(latitude, longitude, 0.0).unwrap(),
        Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap(),
    )
}

fn criteria(threshold: f64, cutoff: f64) -> StarCriteria {
    StarCriteria {
        magnitude_threshold: threshold,
        altitude_cutoff: cutoff,
        size_scale: 5.0,
    }
}

fn segment(name: &str, start: (f64, f64), stop: (f64, f64)) -> ConstellationSegment {
    ConstellationSegment {
        name: name.to_string(),
        start: Equatorial::new(start.0, start.1),
        stop: Equatorial::new(stop.0, stop.1),
    }
}

#[test]
fn gmst_at_j2000() {
    let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    assert_relative_eq!(greenwich_mean_sidereal_time(t), GMST_BASE_DEG, epsilon = 1e-9);
}

#[test]
fn gmst_gains_about_four_minutes_a_day() {
    let t = Utc.with_ymd_and_hms(2022, 3, 1, 0, 0, 0).unwrap();
    let a = greenwich_mean_sidereal_time(t);
    let b = greenwich_mean_sidereal_time(t + Duration::days(1));
    assert_relative_eq!((b - a).rem_euclid(360.0), 0.98564736629, epsilon = 1e-6);
}

#[test]
fn east_longitudes_past_180_match_their_western_form() {
    let east = local_sidereal_time(&observer_at(10.0, 270.0));
    let west = local_sidereal_time(&observer_at(10.0, -90.0));
    assert_relative_eq!(east, west, epsilon = 1e-9);
    assert!((0.0..360.0).contains(&east));
}

#[test]
fn star_on_the_meridian_at_its_declination_is_at_zenith() {
    let observer = observer_at(52.0, 13.4);
    let lst = local_sidereal_time(&observer);
    let h = MeanSiderealTransform.to_horizontal(&[Equatorial::new(lst, 52.0)], &observer);
    assert_relative_eq!(h[0].altitude, 90.0, epsilon = 1e-6);
}

#[test]
fn pole_star_altitude_equals_latitude() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let lat = rng.gen_range(-89.0..89.0);
        let lon = rng.gen_range(-180.0..180.0);
        let observer = observer_at(lat, lon);
        let h = MeanSiderealTransform.to_horizontal(&[Equatorial::new(rng.gen_range(0.0..360.0), 90.0)], &observer);
        assert_relative_eq!(h[0].altitude, lat, epsilon = 1e-6);
    }
}

#[test]
fn equatorial_star_six_hours_west_sets_due_west() {
    let observer = observer_at(0.0, 0.0);
    let lst = local_sidereal_time(&observer);
    let h = MeanSiderealTransform.to_horizontal(&[Equatorial::new(lst - 90.0, 0.0)], &observer);
    assert_relative_eq!(h[0].altitude, 0.0, epsilon = 1e-6);
    assert_relative_eq!(h[0].azimuth, 270.0, epsilon = 1e-6);

    let h = MeanSiderealTransform.to_horizontal(&[Equatorial::new(lst + 90.0, 0.0)], &observer);
    assert_relative_eq!(h[0].azimuth, 90.0, epsilon = 1e-6);
}

#[test]
fn transform_output_ranges() {
    let mut rng = rand::thread_rng();
    let observer = observer_at(12.97, 77.59);
    let positions: Vec<Equatorial> = (0..500)
        .map(|_| Equatorial::new(rng.gen_range(0.0..360.0), rng.gen_range(-90.0..=90.0)))
        .collect();
    let result = MeanSiderealTransform.to_horizontal(&positions, &observer);
    assert_eq!(result.len(), positions.len());
    for h in result {
        assert!((0.0..360.0).contains(&h.azimuth), "azimuth {}", h.azimuth);
        assert!((-90.0..=90.0).contains(&h.altitude), "altitude {}", h.altitude);
    }
}

#[test]
fn cartesian_matches_spherical_mapping() {
    let p = Horizontal::new(0.0, 90.0).to_cartesian(50.0);
    assert_relative_eq!(p.z, 50.0, epsilon = 1e-9);
    let p = Horizontal::new(90.0, 0.0).to_cartesian(2.0);
    assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(p.y, 2.0, epsilon = 1e-9);
    let p = Horizontal::new(123.0, 37.0).to_cartesian(7.0);
    assert_relative_eq!(p.norm(), 7.0, epsilon = 1e-9);
}

#[test]
fn three_star_scenario() {
    let catalog = Catalog::from_stars(vec![
        Star::new(0.0, 90.0, 1.0, 1),
        Star::new(45.0, 0.001, 4.9, 2),
        Star::new(90.0, 45.0, 6.0, 3),
    ]);
    // the near-cutoff star sits a hair above the strict cutoff
    let transform = IdentityTransform::default();
    let result = project_stars(&catalog, &observer_at(0.0, 0.0), &transform, &criteria(5.0, 0.0));
    assert_eq!(transform.calls.get(), 1);
    let indices: Vec<u32> = result.visible.iter().map(|o| o.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert!(result.visible[0].radius > result.visible[1].radius);
    assert_relative_eq!(result.visible[0].radius, 5.0);
    assert_relative_eq!(result.visible[1].radius, 1.1, epsilon = 1e-12);
}

#[test]
fn star_altitude_cut_is_strict() {
    let catalog = Catalog::from_stars(vec![
        Star::new(0.0, 0.0, 1.0, 1),
        Star::new(0.0, 0.5, 1.0, 2),
    ]);
    let result = project_stars(&catalog, &observer_at(0.0, 0.0), &IdentityTransform::default(), &criteria(5.0, 0.0));
    assert_eq!(result.raw.len(), 2);
    let indices: Vec<u32> = result.visible.iter().map(|o| o.index).collect();
    assert_eq!(indices, vec![2]);
}

#[test]
fn magnitude_filter_has_no_false_results() {
    let mut rng = rand::thread_rng();
    let stars: Vec<Star> = (0..300)
        .map(|i| {
            Star::new(
                rng.gen_range(0.0..360.0),
                rng.gen_range(-90.0..90.0),
                rng.gen_range(-1.5..8.0),
                i,
            )
        })
        .collect();
    let catalog = Catalog::from_stars(stars.clone());
    for threshold in [0.5, 2.0, 4.5, 6.0] {
        let result = project_stars(
            &catalog,
            &observer_at(0.0, 0.0),
            &IdentityTransform::default(),
            &criteria(threshold, 10.0),
        );
        assert!(result.raw.iter().all(|o| o.magnitude < threshold));
        let expected: Vec<u32> = stars
            .iter()
            .filter(|s| s.magnitude < threshold && s.dec > 10.0)
            .map(|s| s.index)
            .collect();
        let got: Vec<u32> = result.visible.iter().map(|o| o.index).collect();
        assert_eq!(got, expected);
        assert!(result.visible.iter().all(|o| o.altitude > 10.0));
    }
}

#[test]
fn selection_follows_identifier_order() {
    let catalog = Catalog::from_stars(vec![
        Star::new(0.0, 0.0, 1.0, 30),
        Star::new(0.0, 0.0, 1.0, 4),
        Star::new(0.0, 0.0, 9.0, 1),
        Star::new(0.0, 0.0, 1.0, 12),
    ]);
    let order: Vec<u32> = select_bright(&catalog, 5.0).iter().map(|s| s.index).collect();
    assert_eq!(order, vec![4, 12, 30]);
}

#[test]
fn brighter_means_bigger() {
    assert!(display_radius(-1.0, 4.5, 5.0) > display_radius(3.0, 4.5, 5.0));
    assert_relative_eq!(display_radius(3.5, 4.5, 5.0), 5.0 * 2.0 / 4.5);
}

#[test]
fn degenerate_radii_are_clamped() {
    assert_eq!(clamp_radius(display_radius(6.0, 5.0, 5.0)), (MIN_STAR_RADIUS, true));
    assert_eq!(clamp_radius(display_radius(1.0, 0.0, 5.0)), (MIN_STAR_RADIUS, true));
    assert_eq!(clamp_radius(2.5), (2.5, false));

    // a negative threshold makes every radius negative
    let catalog = Catalog::from_stars(vec![Star::new(0.0, 45.0, -1.46, 1)]);
    let result = project_stars(&catalog, &observer_at(0.0, 0.0), &IdentityTransform::default(), &criteria(-1.0, 0.0));
    assert_eq!(result.visible.len(), 1);
    assert_eq!(result.visible[0].radius, MIN_STAR_RADIUS);
}

#[test]
fn segment_endpoints_are_batched() {
    let segments = vec![
        segment("A", (0.0, 10.0), (10.0, 20.0)),
        segment("B", (0.0, 30.0), (10.0, 40.0)),
        segment("C", (0.0, 50.0), (10.0, 60.0)),
    ];
    let transform = IdentityTransform::default();
    let result = project_constellations(&segments, &observer_at(0.0, 0.0), &transform, 0.0);
    assert_eq!(transform.calls.get(), 2);
    assert_eq!(result.raw.len(), 3);
    assert_eq!(result.raw[1].start, Horizontal::new(0.0, 30.0));
    assert_eq!(result.raw[1].stop, Horizontal::new(10.0, 40.0));
}

#[test]
fn segment_altitude_cut_is_inclusive() {
    let segments = vec![segment("Hor", (0.0, 0.0), (10.0, 0.0))];
    let result = project_constellations(&segments, &observer_at(0.0, 0.0), &IdentityTransform::default(), 0.0);
    assert_eq!(result.filtered.len(), 1);

    // the same altitude fails the strict star test
    let catalog = Catalog::from_stars(vec![Star::new(0.0, 0.0, 1.0, 1)]);
    let stars = project_stars(&catalog, &observer_at(0.0, 0.0), &IdentityTransform::default(), &criteria(5.0, 0.0));
    assert!(stars.visible.is_empty());
}

#[test]
fn one_hidden_segment_drops_the_constellation() {
    let segments = vec![
        segment("Ori", (0.0, 10.0), (10.0, 20.0)),
        segment("Cas", (0.0, 30.0), (10.0, 40.0)),
        segment("Ori", (20.0, 20.0), (30.0, -5.0)),
        segment("Cas", (10.0, 40.0), (20.0, 35.0)),
    ];
    let result = project_constellations(&segments, &observer_at(0.0, 0.0), &IdentityTransform::default(), 0.0);
    assert_eq!(result.raw.len(), 4);
    assert_eq!(result.visible.len(), 3);
    assert_eq!(result.filtered.len(), 2);
    assert!(result.filtered.iter().all(|o| o.name == "Cas"));
    assert!(result
        .filtered
        .iter()
        .all(|o| o.start.altitude >= 0.0 && o.stop.altitude >= 0.0));
}
