//! Constants used throughout the library

/// Minimum number of points in a MediaPipe Face Mesh landmark set
pub const NUM_FACE_MESH_LANDMARKS: usize = 468;

/// Confidence attached to every measurement; reflects trust in the upstream detector
pub const MEASUREMENT_CONFIDENCE: f64 = 0.95;

/// Default consecutive front-facing frames required before the countdown
pub const DEFAULT_FRONT_STABILITY_FRAMES: u32 = 20;

/// Default consecutive profile-facing frames required before the profile scan
pub const DEFAULT_SIDE_STABILITY_FRAMES: u32 = 10;

/// Default number of frames collected per scan phase
pub const DEFAULT_SCAN_FRAMES: usize = 90;

/// Default countdown duration in seconds
pub const DEFAULT_COUNTDOWN_SECS: u64 = 3;

/// Default yaw thresholds in degrees
pub const DEFAULT_FRONT_YAW_THRESHOLD: f64 = 10.0;
pub const DEFAULT_PROFILE_YAW_THRESHOLD: f64 = 35.0;

/// Minimum interpupillary distance as a fraction of the frame diagonal
pub const DEFAULT_MIN_IPD_FRACTION: f64 = 0.10;

/// Face lengths above this are treated as camera distance/angle artifacts
pub const DEFAULT_MAX_FACE_LENGTH_MM: f64 = 280.0;

/// Assumed adult interpupillary distances in millimeters
pub const MALE_IPD_MM: f64 = 64.0;
pub const FEMALE_IPD_MM: f64 = 62.0;
pub const DEFAULT_IPD_MM: f64 = 63.0;

/// Yaw range the asymmetry ratio is mapped onto
pub const MAX_YAW_DEG: f64 = 90.0;

/// Pixel distances at or below this cannot be calibrated
pub const EPSILON: f64 = 1e-6;

/// Neutral starting score for every mask type
pub const BASELINE_SCORE: i32 = 50;

/// Adjustments at least this large carry their reason into the result
pub const MATERIAL_DELTA: i32 = 10;
