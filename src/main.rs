use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trajwalk::config::Config;
use trajwalk::debug_ui;
use trajwalk::desc::{load_segments, Segment};
use trajwalk::dpi::suggest_dpi;
use trajwalk::recordings::latest_log;
use trajwalk::scene::Scene;
use trajwalk::session::Session;
use trajwalk::Error;

/// Replay a pointer recording and overlay distance-walk markers.
#[derive(Debug, Parser)]
#[command(name = "trajwalk", version, about)]
struct Args {
    /// Recording CSV (`timestamp,x,y,clicked` after a header line).
    #[arg(required_unless_present = "log_dir")]
    input: Option<PathBuf>,

    /// Directory of `id_{profile}_cursor_log_*.csv` recordings; the newest one is loaded.
    #[arg(long, requires = "profile", conflicts_with = "input")]
    log_dir: Option<PathBuf>,

    /// Profile id used with --log-dir.
    #[arg(long)]
    profile: Option<String>,

    /// Segment analysis JSON (array of segment objects).
    #[arg(short, long)]
    segments: Option<PathBuf>,

    /// Config JSON (walk + render settings).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the rendered scene to this PNG.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Keep walks inside [start_index, end_index].
    #[arg(long)]
    clamp: bool,

    /// Skip the interactive viewer.
    #[arg(long)]
    no_ui: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if args.clamp {
        config.walk.clamp_to_segment = true;
    }

    let recording = pick_recording(&args)?;
    let mut session = Session::new();
    session.load_csv_file(&recording)?;

    let segments: Vec<Segment> = match &args.segments {
        Some(path) => load_segments(path)?,
        None => Vec::new(),
    };

    let overlay = session.overlay(&segments, config.walk)?;
    info!(
        segments = segments.len(),
        markers = overlay.analysis.markers.len(),
        failed = overlay.analysis.failures.len(),
        "walk finished"
    );
    for failure in &overlay.analysis.failures {
        warn!(segment = failure.segment_i, "skipped: {}", failure.error);
    }
    if let Some(dpi) = suggest_dpi(&segments) {
        info!("suggested pointer speed ratio: {dpi:.2}");
    }

    if let Some(png) = &args.png {
        write_png(&overlay.scene, &config, png)?;
    }

    if !args.no_ui {
        debug_ui::run("trajwalk", session, segments, config).map_err(Error::Ui)?;
    }

    Ok(())
}

fn pick_recording(args: &Args) -> Result<PathBuf, Error> {
    if let Some(input) = &args.input {
        return Ok(input.clone());
    }

    // clap guarantees --log-dir here, and --profile with it.
    let dir = args.log_dir.clone().unwrap_or_default();
    let profile = args.profile.clone().unwrap_or_default();
    let latest = latest_log(&dir, &profile).map_err(|source| Error::Io {
        path: dir.clone(),
        source,
    })?;
    match latest {
        Some(path) => {
            info!(path = %path.display(), "picked latest recording");
            Ok(path)
        }
        None => Err(Error::NoRecording { dir, profile }),
    }
}

#[cfg(feature = "png-io")]
fn write_png(scene: &Scene, config: &Config, path: &Path) -> Result<(), Error> {
    let canvas = trajwalk::canvas::render_scene(scene, &config.render);
    canvas.save_png(path)?;
    info!(path = %path.display(), w = canvas.w, h = canvas.h, "wrote png");
    Ok(())
}

#[cfg(not(feature = "png-io"))]
fn write_png(_scene: &Scene, _config: &Config, _path: &Path) -> Result<(), Error> {
    Err(Error::FeatureDisabled("png-io"))
}
