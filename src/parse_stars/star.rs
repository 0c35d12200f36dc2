use crate::coordinates::Equatorial;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Star {
    /// the catalog number of the star, unique within a parsed catalog
    pub index: u32,
    /// right ascension in degrees, [0, 360)
    pub ra: f64,
    /// declination in degrees, [-90, 90]
    pub dec: f64,
    /// the apparent visual magnitude, lower means brighter
    pub magnitude: f64,
}

impl Star {
    pub fn new(ra: f64, dec: f64, magnitude: f64, index: u32) -> Star {
        Star {
            index,
            ra,
            dec,
            magnitude,
        }
    }

    pub fn get_ra_dec(&self) -> (f64, f64) {
        (self.ra, self.dec)
    }

    pub fn equatorial(&self) -> Equatorial {
        let (ra, dec) = self.get_ra_dec();
        Equatorial::new(ra, dec)
    }
}

/// converts a sexagesimal right ascension (hours, minutes, seconds) into degrees
pub fn ra_from_hms(hours: f64, minutes: f64, seconds: f64) -> f64 {
    (hours + minutes / 60.0 + seconds / 3600.0) / 24.0 * 360.0
}

/// converts a sexagesimal declination into degrees. The sign is carried
/// separately so that "-00 30 00" keeps its sign; it is applied to the
/// magnitude only after the three fields are summed.
pub fn dec_from_dms(negative: bool, degrees: f64, minutes: f64, seconds: f64) -> f64 {
    let dec = degrees + minutes / 60.0 + seconds / 3600.0;
    if negative {
        -dec
    } else {
        dec
    }
}
