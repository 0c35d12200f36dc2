//! Fixed-width bright star catalog reader (Yale Bright Star Catalogue,
//! 5th revised edition, `bsc5.dat`).
//!
//! Records are one per line. Only four things are read out of each record:
//! the HD identifier, the J2000 right ascension and declination in
//! sexagesimal form, and the visual magnitude. Short or otherwise broken
//! records are dropped without failing the whole read.

use crate::error::{LampError, LampResult};
use crate::parse_stars::star::{dec_from_dms, ra_from_hms, Star};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;
use tracing::debug;

/// records shorter than this are not catalog entries
pub const MIN_RECORD_LEN: usize = 100;

const HD_NUMBER: Range<usize> = 25..31;
const RA_HOURS: Range<usize> = 75..77;
const RA_MINUTES: Range<usize> = 77..79;
const RA_SECONDS: Range<usize> = 79..83;
const DEC_SIGN: usize = 83;
const DEC_DEGREES: Range<usize> = 84..86;
const DEC_MINUTES: Range<usize> = 86..88;
const DEC_SECONDS: Range<usize> = 88..90;
const MAGNITUDE: Range<usize> = 102..107;

/// The parsed catalog: O(1) lookup by identifier plus the identifiers in
/// ascending order, which fixes the order of everything derived from it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub stars: HashMap<u32, Star>,
    pub keys: Vec<u32>,
}

impl Catalog {
    pub fn from_stars(stars: impl IntoIterator<Item = Star>) -> Catalog {
        let mut map = HashMap::new();
        for star in stars {
            // a repeated identifier replaces the earlier record
            map.insert(star.index, star);
        }
        let mut keys: Vec<u32> = map.keys().copied().collect();
        keys.sort_unstable();
        Catalog { stars: map, keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// stars in ascending identifier order
    pub fn iter(&self) -> impl Iterator<Item = &Star> {
        self.keys.iter().filter_map(|k| self.stars.get(k))
    }
}

/// reads the catalog file at `path`. A file that cannot be opened or read is
/// fatal and nothing is returned.
pub fn load_catalog(path: &Path) -> LampResult<Catalog> {
    let file = File::open(path).map_err(|e| LampError::io(path, e))?;
    let catalog = parse_catalog(BufReader::new(file)).map_err(|e| LampError::io(path, e))?;
    debug!(path = %path.display(), stars = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// reads records line by line as raw bytes, so a line that is not valid
/// UTF-8 is dropped like any other broken record
pub fn parse_catalog<R: BufRead>(reader: R) -> std::io::Result<Catalog> {
    let mut stars = vec![];
    let mut skipped = 0usize;
    for line in reader.split(b'\n') {
        let line = line?;
        match parse_record(line.strip_suffix(b"\r").unwrap_or(&line)) {
            Some(star) => stars.push(star),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "catalog records ignored");
    }
    Ok(Catalog::from_stars(stars))
}

/// parses a single record, or returns None if any field is unusable
pub fn parse_record(bytes: &[u8]) -> Option<Star> {
    if bytes.len() < MIN_RECORD_LEN {
        return None;
    }

    let hd: u32 = field(bytes, HD_NUMBER)?.parse().ok()?;
    let ra_hours: f64 = field(bytes, RA_HOURS)?.parse().ok()?;
    let ra_minutes: f64 = field(bytes, RA_MINUTES)?.parse().ok()?;
    let ra_seconds: f64 = field(bytes, RA_SECONDS)?.parse().ok()?;
    let dec_negative = *bytes.get(DEC_SIGN)? == b'-';
    let dec_degrees: f64 = field(bytes, DEC_DEGREES)?.parse().ok()?;
    let dec_minutes: f64 = field(bytes, DEC_MINUTES)?.parse().ok()?;
    let dec_seconds: f64 = field(bytes, DEC_SECONDS)?.parse().ok()?;
    let magnitude: f64 = field(bytes, MAGNITUDE)?.parse().ok()?;

    let ra = ra_from_hms(ra_hours, ra_minutes, ra_seconds);
    let dec = dec_from_dms(dec_negative, dec_degrees, dec_minutes, dec_seconds);
    if !(ra.is_finite() && dec.is_finite() && magnitude.is_finite()) {
        return None;
    }
    Some(Star::new(ra, dec, magnitude, hd))
}

fn field(bytes: &[u8], range: Range<usize>) -> Option<&str> {
    if range.end > bytes.len() {
        return None;
    }
    std::str::from_utf8(&bytes[range]).ok().map(str::trim)
}
