//! Mask fitting CLI: replays recorded landmark captures and prints the
//! measurements and mask recommendation.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use mask_fit::{
    calibration::Gender,
    config::{Config, EXAMPLE_CONFIG},
    fixtures::SyntheticFace,
    landmarks::LandmarkFrame,
    recommendation::{recommend, Level, MaskType, Recommendation, UserProfile},
    session::{CaptureResult, CaptureSession, Frame, Phase},
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded capture (YAML) through a session
    Replay {
        /// Recording with frame size, questionnaire and per-frame landmarks
        recording: PathBuf,
    },
    /// Run a capture on synthetic frames
    Demo {
        /// Milliseconds between synthetic frames
        #[arg(long, default_value = "100")]
        frame_ms: u64,
    },
    /// Print an example configuration file
    Config,
}

/// Synthetic frames fed before the demo gives up
const MAX_DEMO_FRAMES: usize = 10_000;

/// A recorded capture
#[derive(Debug, Deserialize)]
struct Recording {
    width: u32,
    height: u32,
    #[serde(default)]
    gender_hint: Option<Gender>,
    #[serde(default)]
    profile: UserProfile,
    frames: Vec<RecordedFrame>,
}

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    /// Time since the previous frame
    #[serde(default)]
    elapsed_ms: u64,
    landmarks: LandmarkFrame,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    capture: &'a CaptureResult,
    recommendation: &'a Recommendation,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(filter));

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    match args.command {
        Command::Replay { recording } => replay(config, &recording),
        Command::Demo { frame_ms } => demo(config, Duration::from_millis(frame_ms)),
        Command::Config => {
            print!("{EXAMPLE_CONFIG}");
            Ok(())
        }
    }
}

fn replay(config: Config, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let recording: Recording = serde_yaml::from_str(&content).context("Invalid recording")?;
    info!("Replaying {} frames from {}", recording.frames.len(), path.display());

    let gender = recording.gender_hint.or(match recording.profile.gender {
        Gender::Unspecified => None,
        g => Some(g),
    });

    let mut session = CaptureSession::new(config)?;
    session.start()?;
    for (i, recorded) in recording.frames.iter().enumerate() {
        if session.is_complete() {
            info!("Capture complete after {i} frames; ignoring the rest");
            break;
        }
        session.advance_timer(Duration::from_millis(recorded.elapsed_ms));
        let frame = Frame::new(&recorded.landmarks, recording.width, recording.height).with_gender_hint(gender);
        let report = session.process_frame(frame)?;
        log::debug!("Frame {i}: {:?} stability {} progress {}%", report.phase, report.stability_counter, report.scan_progress);
    }

    let Some(result) = session.final_results() else {
        bail!("Recording ended in phase {:?} before the capture completed", session.phase());
    };
    print_report(&result, &recording.profile)
}

fn demo(config: Config, frame_interval: Duration) -> Result<()> {
    let frontal = SyntheticFace::frontal();
    let turned = SyntheticFace::profile(24.0, -6.0);
    let user = UserProfile {
        tossing: Level::High,
        preferred_types: vec![MaskType::Pillow],
        ..UserProfile::default()
    };

    let mut session = CaptureSession::new(config)?;
    session.start()?;

    for _ in 0..MAX_DEMO_FRAMES {
        if session.is_complete() {
            break;
        }
        let face = match session.phase() {
            Phase::GuideTurnSide | Phase::ScanningProfile => &turned,
            _ => &frontal,
        };
        session.advance_timer(frame_interval);
        let landmarks = face.landmark_frame();
        session.process_frame(Frame::new(&landmarks, face.frame_width, face.frame_height))?;
    }

    let Some(result) = session.final_results() else {
        bail!("Demo capture stopped in phase {:?}", session.phase());
    };
    print_report(&result, &user)
}

fn print_report(result: &CaptureResult, user: &UserProfile) -> Result<()> {
    for advisory in &result.advisories {
        warn!("{advisory:?}");
    }
    let recommendation = recommend(&result.front, &result.profile, user);
    info!(
        "Recommended size {}, best type {}",
        recommendation.size,
        recommendation
            .best()
            .map_or_else(|| "none".to_string(), |t| t.mask_type.to_string())
    );
    let report = Report {
        capture: result,
        recommendation: &recommendation,
    };
    print!("{}", serde_yaml::to_string(&report)?);
    Ok(())
}
