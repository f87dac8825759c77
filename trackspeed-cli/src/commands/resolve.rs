//! Resolve command: annotate a track file with speed limits.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::{json, Value};
use tracing::info;
use trackspeed::app::{AppConfig, TrackSpeedApp};
use trackspeed::{SpeedLimitResult, TrackPoint};

use super::common::{load_config, resolve_api_key};
use crate::error::CliError;

/// Arguments for `trackspeed resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Track file: a JSON array of {latitude, longitude, timestamp?}
    #[arg(long, short)]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// TomTom API key (overrides config.ini)
    #[arg(long)]
    pub api_key: Option<String>,
}

/// Run the resolve command.
pub fn run(args: ResolveArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let api_key = resolve_api_key(args.api_key, &config)?;
    let points = read_track(&args.input)?;

    info!(
        input = %args.input.display(),
        points = points.len(),
        "Resolving speed limits"
    );

    let app_config = AppConfig::from_config_file(&config, Some(api_key));
    let app = TrackSpeedApp::start_sync(app_config)?;
    let (limits, report) = app.block_on(app.resolve(&points))?;

    let annotated = annotate(&points, &limits);
    let rendered = serde_json::to_string_pretty(&annotated)
        .map_err(|e| CliError::Config(format!("Failed to render output: {}", e)))?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered + "\n").map_err(|error| CliError::FileWrite {
                path: path.clone(),
                error,
            })?;
            println!("Wrote {} points to {}", annotated.len(), path.display());
            println!("{}", report);
        }
        None => {
            println!("{}", rendered);
            eprintln!("{}", report);
        }
    }

    Ok(())
}

/// Read and parse a track file.
fn read_track(path: &Path) -> Result<Vec<TrackPoint>, CliError> {
    let contents = fs::read_to_string(path).map_err(|error| CliError::FileRead {
        path: path.to_path_buf(),
        error,
    })?;

    serde_json::from_str(&contents).map_err(|e| CliError::InvalidTrack {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Pair each point with its resolved limit.
///
/// Points beyond the end of `limits` (an empty result) are written with a
/// null limit.
fn annotate(points: &[TrackPoint], limits: &SpeedLimitResult) -> Vec<Value> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            json!({
                "latitude": point.latitude,
                "longitude": point.longitude,
                "timestamp": point.timestamp,
                "speed_limit_kmh": limits.get(i).copied().flatten(),
            })
        })
        .collect()
}
