//! `hastebatch`: file-batch entrypoint. Loads an event stream and a camera
//! calibration, seeds one or more trackers, runs each to completion against
//! the stream, and writes the recorded trail.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracker_calib::{load_calibration, parse_seed, TrackerSeed};
use tracker_driver::{load_events, run_tracker, undistort_events, write_trail, InitPolicy, TrailEntry};
use tracker_event::Event;
use tracker_variants::TrackerKind;

/// `hastebatch` CLI surface.
#[derive(Parser, Debug)]
#[command(name = "hastebatch", version, about = "Batch event-camera patch tracker")]
struct Args {
    /// Plain text file with events, one `t x y p` per line.
    #[arg(long = "events-file")]
    events_file: PathBuf,

    /// Single seed `t,x,y,theta[,id]`. Mutually exclusive with `--seeds-file`.
    #[arg(long = "seed")]
    seed: Option<String>,

    /// Plain text file with several `t,x,y,theta[,id]` seeds, one per line.
    #[arg(long = "seeds-file")]
    seeds_file: Option<PathBuf>,

    /// Scoring variant to run for every seed.
    #[arg(long = "tracker-type")]
    tracker_type: TrackerKind,

    /// Load only the first N events from the event file.
    #[arg(long = "num-events")]
    num_events: Option<usize>,

    /// Sensor resolution, `WIDTHxHEIGHT`. Defaults to the DAVIS240c size.
    #[arg(long = "camera-size", default_value = "240x180")]
    camera_size: CameraSize,

    /// Optional rad-tan calibration file (`fx fy cx cy k1 k2 p1 p2 k3`). When
    /// omitted, events are used as-is without undistortion.
    #[arg(long = "camera-params-file")]
    camera_params_file: Option<PathBuf>,

    /// Force centered (backward+forward) initialisation for every seed.
    #[arg(long = "centered-initialization", default_value_t = false)]
    centered_initialization: bool,

    /// Write the recorded tracking trail here.
    #[arg(long = "output-file")]
    output_file: Option<PathBuf>,

    /// Log file path. Defaults to `hastebatch.log` in the working directory.
    #[arg(long = "log-file", default_value = "hastebatch.log")]
    log_file: PathBuf,
}

#[derive(Debug, Clone, Copy)]
struct CameraSize {
    width: u16,
    height: u16,
}

#[derive(Debug, thiserror::Error)]
#[error("expected WIDTHxHEIGHT, got {0:?}")]
struct ParseCameraSizeError(String);

impl std::str::FromStr for CameraSize {
    type Err = ParseCameraSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once('x').ok_or_else(|| ParseCameraSizeError(s.to_string()))?;
        let width: u16 = w.parse().map_err(|_| ParseCameraSizeError(s.to_string()))?;
        let height: u16 = h.parse().map_err(|_| ParseCameraSizeError(s.to_string()))?;
        Ok(Self { width, height })
    }
}

fn configure_logging(log_file: &Path) -> Result<WorkerGuard> {
    if log_file.exists() {
        let _ = std::fs::remove_file(log_file);
    }
    let dir = log_file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let name = log_file.file_name().context("log file path has no file name")?;
    let file_appender = tracing_appender::rolling::never(dir, name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .init();
    Ok(guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn load_seeds(args: &Args) -> Result<Vec<TrackerSeed>> {
    match (&args.seed, &args.seeds_file) {
        (Some(s), None) => Ok(vec![parse_seed(s).with_context(|| format!("parsing --seed {s:?}"))?]),
        (None, Some(path)) => {
            tracker_calib::load_seeds(path).with_context(|| format!("loading seeds file {}", path.display()))
        }
        (Some(_), Some(_)) => bail!("--seed and --seeds-file are mutually exclusive"),
        (None, None) => bail!("one of --seed or --seeds-file is required"),
    }
}

fn load_tracking_events(args: &Args) -> Result<Vec<Event>> {
    let raw = load_events(&args.events_file, args.num_events)
        .with_context(|| format!("loading event stream {}", args.events_file.display()))?;
    info!(target: "hastebatch", count = raw.len(), "events_loaded");

    match &args.camera_params_file {
        Some(path) => {
            let camera = load_calibration(path, args.camera_size.width, args.camera_size.height)
                .with_context(|| format!("loading camera calibration {}", path.display()))?;
            info!(target: "hastebatch", "applying_undistortion");
            let map = tracker_calib::UndistortionMap::build(&camera);
            Ok(undistort_events(&raw, &map))
        }
        None => Ok(raw
            .into_iter()
            .map(|r| Event::new(r.t, r.x as f32, r.y as f32))
            .collect()),
    }
}

fn run(args: &Args) -> Result<Vec<TrailEntry>> {
    let seeds = load_seeds(args)?;
    let events = load_tracking_events(args)?;
    let policy = if args.centered_initialization { InitPolicy::Centered } else { InitPolicy::Regular };
    let width = args.camera_size.width;
    let height = args.camera_size.height;

    let mut trail = Vec::new();
    for seed in &seeds {
        info!(target: "hastebatch", id = seed.id, t = seed.t, x = seed.x, y = seed.y, "starting_tracker");
        let entries = run_tracker(args.tracker_type, seed, &events, policy, width, height);
        if entries.is_empty() {
            info!(target: "hastebatch", id = seed.id, "tracker_not_initialised");
        }
        trail.extend(entries);
    }
    Ok(trail)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_file)?;
    install_panic_hook();
    info!(target: "hastebatch", "startup");

    let trail = run(&args)?;

    if let Some(path) = &args.output_file {
        write_trail(path, &trail).with_context(|| format!("writing output file {}", path.display()))?;
        info!(target: "hastebatch", path = %path.display(), entries = trail.len(), "trail_written");
    }

    Ok(())
}
