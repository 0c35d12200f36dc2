//! Readers for the two text inputs of a lamp: the fixed-width bright star
//! catalog and the constellation stick-figure line list.
pub mod catalog;
pub mod constellation;
pub mod star;

pub use catalog::{load_catalog, Catalog};
pub use constellation::{load_constellations, ConstellationSegment};
pub use star::Star;
