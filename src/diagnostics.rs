//! Optional CSV dumps of the intermediate observations.
//!
//! The projections never write anything themselves; the run hands their
//! stages to a `DiagnosticSink`. Use `NullSink` when nobody is looking.

use crate::coordinates::{ConstellationObservation, StarObservation};
use crate::error::{LampError, LampResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    /// straight out of the transform
    Raw,
    /// passed the altitude test
    Visible,
    /// what goes on the lamp
    Filtered,
}

impl Stage {
    fn as_str(&self) -> &'static str {
        match self {
            Stage::Raw => "raw",
            Stage::Visible => "visible",
            Stage::Filtered => "filtered",
        }
    }
}

pub trait DiagnosticSink {
    fn record_stars(&mut self, stage: Stage, stars: &[StarObservation]) -> LampResult<()>;
    fn record_constellations(
        &mut self,
        stage: Stage,
        segments: &[ConstellationObservation],
    ) -> LampResult<()>;
}

#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record_stars(&mut self, _: Stage, _: &[StarObservation]) -> LampResult<()> {
        Ok(())
    }

    fn record_constellations(&mut self, _: Stage, _: &[ConstellationObservation]) -> LampResult<()> {
        Ok(())
    }
}

/// Writes `stars_<stage>.csv` and `constellations_<stage>.csv` into a
/// directory, numbers with six decimals.
#[derive(Debug)]
pub struct CsvDirSink {
    dir: PathBuf,
}

impl CsvDirSink {
    /// creates the directory if needed
    pub fn new(dir: &Path) -> LampResult<CsvDirSink> {
        fs::create_dir_all(dir).map_err(|e| LampError::io(dir, e))?;
        Ok(CsvDirSink {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, kind: &str, stage: Stage) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", kind, stage.as_str()))
    }

    fn write(&self, kind: &str, stage: Stage, header: &[&str], rows: Vec<Vec<String>>) -> LampResult<()> {
        let path = self.path_for(kind, stage);
        let file = fs::File::create(&path).map_err(|e| LampError::io(&path, e))?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(header)?;
        for row in &rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|e| LampError::io(&path, e))?;
        debug!(path = %path.display(), rows = rows.len(), "diagnostics written");
        Ok(())
    }
}

fn fixed(value: f64) -> String {
    format!("{:.6}", value)
}

impl DiagnosticSink for CsvDirSink {
    fn record_stars(&mut self, stage: Stage, stars: &[StarObservation]) -> LampResult<()> {
        let rows = stars
            .iter()
            .map(|s| {
                vec![
                    s.index.to_string(),
                    fixed(s.azimuth),
                    fixed(s.altitude),
                    fixed(s.magnitude),
                    fixed(s.radius),
                ]
            })
            .collect();
        self.write(
            "stars",
            stage,
            &["index", "azimuth", "altitude", "magnitude", "radius"],
            rows,
        )
    }

    fn record_constellations(
        &mut self,
        stage: Stage,
        segments: &[ConstellationObservation],
    ) -> LampResult<()> {
        let rows = segments
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    fixed(c.start.azimuth),
                    fixed(c.start.altitude),
                    fixed(c.stop.azimuth),
                    fixed(c.stop.altitude),
                ]
            })
            .collect();
        self.write(
            "constellations",
            stage,
            &["name", "start_azimuth", "start_altitude", "stop_azimuth", "stop_altitude"],
            rows,
        )
    }
}
