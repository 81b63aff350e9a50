//! Lidarview Application
//!
//! Interactive viewer for KITTI-style recording sequences: LiDAR sweeps,
//! camera images and the vehicle trajectory, one frame at a time.

mod logging;

use clap::Parser;
use lidarview_data::{DatasetLayout, FrameSession, FrameSource, Settings};
use lidarview_window::{ViewerConfig, ViewerError};
use logging::LoggingConfig;
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_SEQUENCE: &str = "data/kitti/sequences/00";

/// Lidarview - LiDAR, camera and pose sequence viewer
#[derive(Parser, Debug)]
#[command(name = "lidarview")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file with `key = value` lines
    #[arg(short, long, default_value = "settings.ini")]
    config: PathBuf,

    /// Sequence directory, overrides `sequence_path`
    #[arg(short, long)]
    sequence: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace), overrides `log_level`
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("Application error: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ViewerError> {
    let (settings, settings_error) = match Settings::load(&args.config) {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err)),
    };

    let logging = LoggingConfig::from_settings(&settings, args.log_level.as_deref());
    let _log_guard = logging.install();
    if let Some(err) = settings_error {
        warn!("{err}; using default settings");
    } else {
        info!("Loaded {} settings from {}", settings.len(), args.config.display());
    }

    let sequence = sequence_path(&settings, args.sequence);
    let source = FrameSource::open(sequence, dataset_layout(&settings))?;
    if source.total_frames() == 0 {
        warn!("Sequence at {} has no frames", source.root().display());
    }
    let session = FrameSession::new(source);

    lidarview_window::run(ViewerConfig::from_settings(&settings), session)
}

fn sequence_path(settings: &Settings, cli: Option<PathBuf>) -> PathBuf {
    cli.unwrap_or_else(|| PathBuf::from(settings.get_string("sequence_path", DEFAULT_SEQUENCE)))
}

/// KITTI layout with directory and file names overridable from settings.
fn dataset_layout(settings: &Settings) -> DatasetLayout {
    let defaults = DatasetLayout::default();
    DatasetLayout {
        point_cloud_dir: settings.get_string("velodyne_dir", &defaults.point_cloud_dir),
        image_dir: settings.get_string("image_dir", &defaults.image_dir),
        poses_file: settings.get_string("poses_file", &defaults.poses_file),
        ..defaults
    }
}
