//! Solids for the lamp: a small constructive solid geometry value type and
//! the features that get carved into (or added onto) the shell.
pub mod features;
pub mod solid;

pub use features::{star_bump, star_cutout, stick_figure};
pub use solid::{write_scad, Solid};
