//! Lamp parameters, their defaults, and the optional JSON config file.
//!
//! Values are resolved in three layers: command line flags win over the
//! config file, which wins over the built-in defaults.

use crate::coordinates::StarCriteria;
use crate::error::{LampError, LampResult};
use serde_derive::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_GLOBE_SIZE: f64 = 50.0;
pub const DEFAULT_THICKNESS_RATIO: f64 = 0.2;
pub const DEFAULT_STAR_RATIO: f64 = 0.1;
pub const DEFAULT_MAGNITUDE: f64 = 4.5;
pub const DEFAULT_ALTITUDE_CUTOFF: f64 = 0.0;
pub const DEFAULT_STICK_BREADTH: f64 = 0.5;
pub const DEFAULT_SEGMENTS: u32 = 50;
pub const DEFAULT_CUT_RATIO: f64 = -0.5;
pub const DEFAULT_CATALOG: &str = "Raw-Data/bsc5.dat";
pub const DEFAULT_OUTPUT: &str = "sky-lamp.scad";

/// How stars end up on the shell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FeatureMode {
    /// holes through the shell
    #[default]
    Cut,
    /// cylinders standing out of the shell
    Raised,
}

/// Every setting that can come from the config file or the command line.
/// Unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LampConfig {
    pub catalog: Option<PathBuf>,
    pub constellations: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub debug_csv: Option<PathBuf>,
    pub magnitude: Option<f64>,
    pub globe_size: Option<f64>,
    pub star_ratio: Option<f64>,
    pub altitude_cutoff: Option<f64>,
    pub thickness_ratio: Option<f64>,
    pub stick_breadth: Option<f64>,
    pub segments: Option<u32>,
    pub cut_ratio: Option<f64>,
    pub raised: Option<bool>,
    pub two_layer: Option<bool>,
}

impl LampConfig {
    pub fn load(path: &Path) -> LampResult<LampConfig> {
        let file = File::open(path).map_err(|e| LampError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LampError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// fills every unset field of `self` from `lower`
    pub fn or(self, lower: LampConfig) -> LampConfig {
        LampConfig {
            catalog: self.catalog.or(lower.catalog),
            constellations: self.constellations.or(lower.constellations),
            output: self.output.or(lower.output),
            debug_csv: self.debug_csv.or(lower.debug_csv),
            magnitude: self.magnitude.or(lower.magnitude),
            globe_size: self.globe_size.or(lower.globe_size),
            star_ratio: self.star_ratio.or(lower.star_ratio),
            altitude_cutoff: self.altitude_cutoff.or(lower.altitude_cutoff),
            thickness_ratio: self.thickness_ratio.or(lower.thickness_ratio),
            stick_breadth: self.stick_breadth.or(lower.stick_breadth),
            segments: self.segments.or(lower.segments),
            cut_ratio: self.cut_ratio.or(lower.cut_ratio),
            raised: self.raised.or(lower.raised),
            two_layer: self.two_layer.or(lower.two_layer),
        }
    }

    pub fn paths(&self) -> RunPaths {
        RunPaths {
            catalog: self
                .catalog
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG)),
            constellations: self.constellations.clone(),
            output: self
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            debug_csv: self.debug_csv.clone(),
        }
    }

    pub fn parameters(&self) -> LampResult<LampParameters> {
        let globe_size = self.globe_size.unwrap_or(DEFAULT_GLOBE_SIZE);
        let params = LampParameters {
            shell_radius: globe_size,
            thickness: globe_size * self.thickness_ratio.unwrap_or(DEFAULT_THICKNESS_RATIO),
            magnitude_cutoff: self.magnitude.unwrap_or(DEFAULT_MAGNITUDE),
            altitude_cutoff: self.altitude_cutoff.unwrap_or(DEFAULT_ALTITUDE_CUTOFF),
            stick_breadth: self.stick_breadth.unwrap_or(DEFAULT_STICK_BREADTH),
            star_size_scale: globe_size * self.star_ratio.unwrap_or(DEFAULT_STAR_RATIO),
            segments: self.segments.unwrap_or(DEFAULT_SEGMENTS),
            cut_ratio: self.cut_ratio.unwrap_or(DEFAULT_CUT_RATIO),
            feature_mode: if self.raised.unwrap_or(false) {
                FeatureMode::Raised
            } else {
                FeatureMode::Cut
            },
            two_layer: self.two_layer.unwrap_or(false),
        };
        params.validate()?;
        Ok(params)
    }
}

/// Where inputs are read from and outputs go. Nothing else in the crate
/// knows a file name.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub catalog: PathBuf,
    pub constellations: Option<PathBuf>,
    pub output: PathBuf,
    pub debug_csv: Option<PathBuf>,
}

/// The resolved shape of one lamp, in model units (millimetres for a
/// printer) and degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LampParameters {
    pub shell_radius: f64,
    pub thickness: f64,
    pub magnitude_cutoff: f64,
    pub altitude_cutoff: f64,
    /// half-width of a constellation stick
    pub stick_breadth: f64,
    pub star_size_scale: f64,
    /// OpenSCAD $fn
    pub segments: u32,
    /// height of the bottom cut as a fraction of the radius, in [-1, 1)
    pub cut_ratio: f64,
    pub feature_mode: FeatureMode,
    pub two_layer: bool,
}

impl Default for LampParameters {
    fn default() -> Self {
        LampParameters {
            shell_radius: DEFAULT_GLOBE_SIZE,
            thickness: DEFAULT_GLOBE_SIZE * DEFAULT_THICKNESS_RATIO,
            magnitude_cutoff: DEFAULT_MAGNITUDE,
            altitude_cutoff: DEFAULT_ALTITUDE_CUTOFF,
            stick_breadth: DEFAULT_STICK_BREADTH,
            star_size_scale: DEFAULT_GLOBE_SIZE * DEFAULT_STAR_RATIO,
            segments: DEFAULT_SEGMENTS,
            cut_ratio: DEFAULT_CUT_RATIO,
            feature_mode: FeatureMode::Cut,
            two_layer: false,
        }
    }
}

impl LampParameters {
    pub fn validate(&self) -> LampResult<()> {
        let positive = |name: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(LampError::invalid_parameter(name, format!("{} must be positive", value)))
            }
        };
        positive("globe size", self.shell_radius)?;
        positive("thickness", self.thickness)?;
        positive("stick breadth", self.stick_breadth)?;
        positive("star size", self.star_size_scale)?;
        if self.thickness >= self.shell_radius {
            return Err(LampError::invalid_parameter(
                "thickness",
                format!("{} must be less than the radius {}", self.thickness, self.shell_radius),
            ));
        }
        if !self.magnitude_cutoff.is_finite() {
            return Err(LampError::invalid_parameter("magnitude", "must be a number"));
        }
        if !(-90.0..=90.0).contains(&self.altitude_cutoff) {
            return Err(LampError::invalid_parameter(
                "altitude cutoff",
                format!("{} outside [-90, 90]", self.altitude_cutoff),
            ));
        }
        if self.segments < 3 {
            return Err(LampError::invalid_parameter("segments", "need at least 3"));
        }
        if !(-1.0..1.0).contains(&self.cut_ratio) {
            return Err(LampError::invalid_parameter(
                "cut ratio",
                format!("{} outside [-1, 1)", self.cut_ratio),
            ));
        }
        Ok(())
    }

    pub fn star_criteria(&self) -> StarCriteria {
        StarCriteria {
            magnitude_threshold: self.magnitude_cutoff,
            altitude_cutoff: self.altitude_cutoff,
            size_scale: self.star_size_scale,
        }
    }
}
