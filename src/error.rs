use std::path::PathBuf;
use thiserror::Error;

pub type LampResult<T> = Result<T, LampError>;

/// Everything that can abort a lamp-generation run.
///
/// Malformed catalog or constellation lines are not represented here: they
/// are skipped by the parsers and only show up in the debug log.
#[derive(Debug, Error)]
pub enum LampError {
    #[error("could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid observer location '{0}', expected lat:lon or lat:lon:height")]
    InvalidLocation(String),

    #[error("invalid observation time '{0}', expected an RFC 3339 UTC instant or 'now'")]
    InvalidTime(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("could not read config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("diagnostic csv output failed: {0}")]
    Csv(#[from] csv::Error),
}

impl LampError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
