//! Constellation stick-figure line lists.
//!
//! Every record is `<name> <ra1> <dec1> <ra2> <dec2>`, whitespace
//! separated, coordinates in decimal degrees. Lines starting with `#` are
//! comments. A constellation is simply every segment sharing a name.

use crate::coordinates::Equatorial;
use crate::error::{LampError, LampResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

pub const COMMENT_MARKER: char = '#';
/// a name and four one-digit numbers need at least this much
pub const MIN_LINE_LEN: usize = 9;

static SEGMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        ^\s*
        (\S+)                                 # constellation name
        \s+([+-]?(?:\d+\.?\d*|\.\d+))         # ra1
        \s+([+-]?(?:\d+\.?\d*|\.\d+))         # dec1
        \s+([+-]?(?:\d+\.?\d*|\.\d+))         # ra2
        \s+([+-]?(?:\d+\.?\d*|\.\d+))         # dec2
        \s*$
        "#,
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationSegment {
    pub name: String,
    pub start: Equatorial,
    pub stop: Equatorial,
}

pub fn load_constellations(path: &Path) -> LampResult<Vec<ConstellationSegment>> {
    let file = File::open(path).map_err(|e| LampError::io(path, e))?;
    let segments =
        parse_constellations(BufReader::new(file)).map_err(|e| LampError::io(path, e))?;
    debug!(path = %path.display(), segments = segments.len(), "constellation lines loaded");
    Ok(segments)
}

/// lines that are not valid UTF-8 are skipped along with other malformed ones
pub fn parse_constellations<R: BufRead>(reader: R) -> std::io::Result<Vec<ConstellationSegment>> {
    let mut segments = vec![];
    for line in reader.split(b'\n') {
        let segment = String::from_utf8(line?)
            .ok()
            .and_then(|line| parse_segment(line.trim_end_matches('\r')));
        if let Some(segment) = segment {
            segments.push(segment);
        }
    }
    Ok(segments)
}

pub fn parse_segment(line: &str) -> Option<ConstellationSegment> {
    if line.starts_with(COMMENT_MARKER) || line.trim_end().len() < MIN_LINE_LEN {
        return None;
    }
    let caps = SEGMENT_REGEX.captures(line)?;
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
    Some(ConstellationSegment {
        name: caps.get(1)?.as_str().to_string(),
        start: Equatorial::new(number(2)?, number(3)?),
        stop: Equatorial::new(number(4)?, number(5)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    #[test]
    fn parses_a_segment() {
        let seg = parse_segment("UMa  165.93  61.75\t178.46 53.69").unwrap();
        assert_eq!(seg.name, "UMa");
        assert_relative_eq!(seg.start.ra, 165.93);
        assert_relative_eq!(seg.start.dec, 61.75);
        assert_relative_eq!(seg.stop.ra, 178.46);
        assert_relative_eq!(seg.stop.dec, 53.69);
    }

    #[test]
    fn signed_numbers() {
        let seg = parse_segment("Ori 88.79 +7.41 81.28 -8.20").unwrap();
        assert_relative_eq!(seg.start.dec, 7.41);
        assert_relative_eq!(seg.stop.dec, -8.2);
        let seg = parse_segment("Cru .5 -60. 1 -57").unwrap();
        assert_relative_eq!(seg.start.ra, 0.5);
        assert_relative_eq!(seg.start.dec, -60.0);
    }

    #[test]
    fn skips_comments_short_and_malformed_lines() {
        assert!(parse_segment("# UMa 1 2 3 4").is_none());
        assert!(parse_segment("A 1 2 3").is_none());
        assert!(parse_segment("UMa 1 2 3").is_none());
        assert!(parse_segment("UMa 1 2 3 4 5").is_none());
        assert!(parse_segment("UMa 1 two 3 4").is_none());
        assert!(parse_segment("UMa 1e3 2 3 4").is_none());
        assert!(parse_segment("").is_none());
    }

    #[test]
    fn names_may_repeat() {
        let text = "# Orion belt\nOri 83.0 -0.3 84.05 -1.2\nOri 84.05 -1.2 85.19 -1.94\n\nCas 2.29 59.15 10.13 56.54\n";
        let segments = parse_constellations(Cursor::new(text)).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].name, "Ori");
        assert_eq!(segments[1].name, "Ori");
        assert_eq!(segments[2].name, "Cas");
    }

    #[test]
    fn undecodable_lines_do_not_stop_the_read() {
        let text = b"Ori 83.0 -0.3 84.05 -1.2\r\nOri \xff\xfe 1 2 3\nCas 2.29 59.15 10.13 56.54".to_vec();
        let segments = parse_constellations(Cursor::new(text)).unwrap();
        let names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ori", "Cas"]);
        assert_relative_eq!(segments[0].stop.dec, -1.2);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_constellations(Path::new("nowhere/lines.txt")).unwrap_err();
        assert!(matches!(err, LampError::Io { .. }));
    }
}
