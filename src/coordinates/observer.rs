use crate::error::{LampError, LampResult};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// below this the height is almost certainly a typo, but it is only warned about
const HEIGHT_SANITY_BOUND: f64 = -1000.0;

/// A point on the ground in geodetic degrees and metres above the ellipsoid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, height: f64) -> LampResult<Location> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(LampError::InvalidLocation(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..360.0).contains(&longitude) {
            return Err(LampError::InvalidLocation(format!(
                "longitude {} outside [-180, 360)",
                longitude
            )));
        }
        if !height.is_finite() {
            return Err(LampError::InvalidLocation(format!("height {}", height)));
        }
        if height < HEIGHT_SANITY_BOUND {
            warn!(height, "observer height is far below sea level");
        }
        Ok(Location {
            latitude,
            longitude,
            height,
        })
    }
}

impl Default for Location {
    /// Bangalore
    fn default() -> Self {
        Location {
            latitude: 12.97,
            longitude: 77.59,
            height: 926.0,
        }
    }
}

/// parses `lat:lon` or `lat:lon:height`
impl FromStr for Location {
    type Err = LampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(LampError::InvalidLocation(s.to_string()));
        }
        let mut values = [0.0f64; 3];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .trim()
                .parse()
                .map_err(|_| LampError::InvalidLocation(s.to_string()))?;
        }
        Location::new(values[0], values[1], values[2])
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.latitude, self.longitude, self.height)
    }
}

/// Where and when the sky is looked at. The instant is always UTC.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObserverContext {
    pub location: Location,
    pub time: DateTime<Utc>,
}

impl ObserverContext {
    pub fn new(location: Location, time: DateTime<Utc>) -> ObserverContext {
        ObserverContext { location, time }
    }
}

/// parses an RFC 3339 instant (any offset, converted to UTC) or `now`
pub fn parse_time(s: &str) -> LampResult<DateTime<Utc>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(Utc::now());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| LampError::InvalidTime(s.to_string()))
}
