//! Facial measurement and CPAP mask recommendation from face landmark streams.
//!
//! This library turns per-frame face landmarks, as produced by an external
//! `MediaPipe` Face Mesh style detector, into physical measurements and a mask
//! recommendation:
//! - Pixel distances are calibrated to millimeters against an assumed
//!   interpupillary distance
//! - Head yaw is approximated from 2D landmark asymmetry to guide the user
//! - Fixed-size scan buffers average many frames per pose
//! - A declarative rule table scores the mask types against a questionnaire
//!
//! The capture pipeline consists of:
//! 1. Guiding the user to a stable frontal pose
//! 2. A countdown driven by the caller's timer
//! 3. Scanning frontal frames and freezing the scale factor
//! 4. Guiding the user to turn to the side
//! 5. Scanning profile frames with the frozen scale
//!
//! # Examples
//!
//! ## Driving a capture session
//!
//! ```no_run
//! use mask_fit::{
//!     config::Config,
//!     landmarks::LandmarkFrame,
//!     session::{CaptureSession, Frame},
//! };
//! use std::time::Duration;
//!
//! # fn next_frame() -> LandmarkFrame { LandmarkFrame::empty() }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = CaptureSession::new(Config::default())?;
//! session.start()?;
//!
//! while !session.is_complete() {
//!     // Landmarks from the detector, normalized to the frame
//!     let landmarks = next_frame();
//!     session.advance_timer(Duration::from_millis(33));
//!     let report = session.process_frame(Frame::new(&landmarks, 1280, 720))?;
//!     println!("{:?} {}%", report.phase, report.scan_progress);
//! }
//!
//! if let Some(result) = session.final_results() {
//!     println!("Face length: {:.1} mm", result.front.face_length_mm);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Recommending a mask
//!
//! ```no_run
//! use mask_fit::recommendation::{recommend, Level, UserProfile};
//! # use mask_fit::session::CaptureResult;
//!
//! # fn capture() -> CaptureResult { unimplemented!() }
//! let result = capture();
//! let user = UserProfile {
//!     mouth_breathing: true,
//!     pressure: Level::High,
//!     ..UserProfile::default()
//! };
//!
//! let recommendation = recommend(&result.front, &result.profile, &user);
//! println!("Size {}", recommendation.size);
//! for t in &recommendation.ranked_types {
//!     println!("{}: {}", t.mask_type, t.score);
//! }
//! ```

/// Landmark frames, anatomical roles and pixel-space faces
pub mod landmarks;

/// Pixel to millimeter calibration from the interpupillary distance
pub mod calibration;

/// Frontal and profile measurements
pub mod measurement;

/// Yaw estimation and frame validity checks
pub mod pose;

/// Fixed-capacity averaging buffers
pub mod buffer;

/// Capture session state machine
pub mod session;

/// Mask size and type recommendation
pub mod recommendation;

/// Synthetic landmark frames for tests, benchmarks and demos
pub mod fixtures;

/// Small numeric helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
