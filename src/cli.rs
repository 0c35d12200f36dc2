//! Command line definition.

use crate::config::LampConfig;
use crate::coordinates::observer::parse_time;
use crate::coordinates::Location;
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "star-lamp")]
#[command(about = "Generate an OpenSCAD star lamp for a place and time")]
#[command(version)]
pub struct Cli {
    /// Observation time, RFC 3339 (e.g. 2022-06-21T22:00:00+05:30) or "now"
    #[arg(short, long, value_parser = parse_time)]
    pub time: Option<DateTime<Utc>>,

    /// Observer location as lat:lon or lat:lon:height [default: 12.97:77.59:926]
    #[arg(short, long, allow_hyphen_values = true)]
    pub location: Option<Location>,

    /// Only stars brighter than this magnitude [default: 4.5]
    #[arg(short, long)]
    pub magnitude: Option<f64>,

    /// Outer radius of the globe [default: 50]
    #[arg(short, long)]
    pub globe_size: Option<f64>,

    /// Size of a magnitude-below-threshold star relative to the globe [default: 0.1]
    #[arg(short = 'r', long)]
    pub star_ratio: Option<f64>,

    /// Lowest altitude in degrees that still counts as visible [default: 0]
    #[arg(short, long, allow_hyphen_values = true)]
    pub altitude_cutoff: Option<f64>,

    /// Shell thickness relative to the globe [default: 0.2]
    #[arg(long)]
    pub thickness_ratio: Option<f64>,

    /// Half-width of constellation sticks [default: 0.5]
    #[arg(long)]
    pub stick_breadth: Option<f64>,

    /// Facets per full circle in the output ($fn) [default: 50]
    #[arg(long)]
    pub segments: Option<u32>,

    /// Height of the bottom cut relative to the radius [default: -0.5]
    #[arg(long, allow_hyphen_values = true)]
    pub cut_ratio: Option<f64>,

    /// Yale Bright Star Catalogue file [default: Raw-Data/bsc5.dat]
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Constellation line file; no sticks without it
    #[arg(long)]
    pub constellations: Option<PathBuf>,

    /// Output file [default: sky-lamp.scad]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for CSV dumps of the intermediate observations
    #[arg(long)]
    pub debug_csv: Option<PathBuf>,

    /// Raise stars out of the shell instead of cutting holes
    #[arg(long)]
    pub raised: bool,

    /// Two-layer shell with the sticks engraved down to a mid-shell
    #[arg(long)]
    pub two_layer: bool,

    /// JSON file with any of the settings above; flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// the settings given on the command line, everything else unset
    pub fn overrides(&self) -> LampConfig {
        LampConfig {
            catalog: self.catalog.clone(),
            constellations: self.constellations.clone(),
            output: self.output.clone(),
            debug_csv: self.debug_csv.clone(),
            magnitude: self.magnitude,
            globe_size: self.globe_size,
            star_ratio: self.star_ratio,
            altitude_cutoff: self.altitude_cutoff,
            thickness_ratio: self.thickness_ratio,
            stick_breadth: self.stick_breadth,
            segments: self.segments,
            cut_ratio: self.cut_ratio,
            raised: self.raised.then_some(true),
            two_layer: self.two_layer.then_some(true),
        }
    }
}
