mod cli;
mod config;
mod coordinates;
mod diagnostics;
mod error;
mod geometry;
mod lamp;
mod parse_stars;

use crate::cli::Cli;
use crate::config::LampConfig;
use crate::coordinates::{MeanSiderealTransform, ObserverContext};
use crate::diagnostics::{CsvDirSink, DiagnosticSink, NullSink};
use crate::error::LampResult;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> LampResult<()> {
    let file_config = match &cli.config {
        Some(path) => LampConfig::load(path)?,
        None => LampConfig::default(),
    };
    let config = cli.overrides().or(file_config);
    let params = config.parameters()?;
    let paths = config.paths();

    let observer = ObserverContext::new(
        cli.location.unwrap_or_default(),
        cli.time.unwrap_or_else(Utc::now),
    );
    info!(
        location = %observer.location,
        time = %observer.time.to_rfc3339(),
        magnitude = params.magnitude_cutoff,
        radius = params.shell_radius,
        "generating lamp"
    );

    let mut sink: Box<dyn DiagnosticSink> = match &paths.debug_csv {
        Some(dir) => Box::new(CsvDirSink::new(dir)?),
        None => Box::new(NullSink),
    };
    let summary = lamp::generate(&params, &paths, &observer, &MeanSiderealTransform, sink.as_mut())?;
    info!(
        catalog_stars = summary.catalog_stars,
        bright_stars = summary.bright_stars,
        visible_stars = summary.visible_stars,
        segments = summary.constellation_segments,
        kept_segments = summary.kept_segments,
        output = %paths.output.display(),
        "lamp written"
    );
    Ok(())
}
