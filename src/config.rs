//! Configuration management for capture sessions

use crate::constants::{
    DEFAULT_COUNTDOWN_SECS, DEFAULT_FRONT_STABILITY_FRAMES, DEFAULT_FRONT_YAW_THRESHOLD, DEFAULT_IPD_MM,
    DEFAULT_MAX_FACE_LENGTH_MM, DEFAULT_MIN_IPD_FRACTION, DEFAULT_PROFILE_YAW_THRESHOLD, DEFAULT_SCAN_FRAMES,
    DEFAULT_SIDE_STABILITY_FRAMES, FEMALE_IPD_MM, MALE_IPD_MM, MAX_YAW_DEG,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Library configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capture session pacing
    pub capture: CaptureConfig,

    /// Pose and validity thresholds
    pub pose: PoseConfig,

    /// Assumed physiological constants for calibration
    pub calibration: CalibrationConfig,
}

/// Capture session pacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Consecutive front-facing frames required to leave the front guide
    pub front_stability_frames: u32,

    /// Consecutive profile-facing frames required to leave the side guide
    pub side_stability_frames: u32,

    /// Frames collected per scan phase
    pub scan_frames: usize,

    /// Countdown between the front guide and the front scan
    pub countdown_secs: u64,
}

/// Pose and validity thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// |yaw| below this is front-facing (degrees)
    pub front_yaw_threshold_deg: f64,

    /// |yaw| above this is profile-facing (degrees)
    pub profile_yaw_threshold_deg: f64,

    /// Minimum IPD as a fraction of the frame diagonal
    pub min_ipd_fraction: f64,

    /// Face lengths above this raise an advisory (mm)
    pub max_face_length_mm: f64,
}

/// Assumed average interpupillary distances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Male IPD (mm)
    pub male_ipd_mm: f64,

    /// Female IPD (mm)
    pub female_ipd_mm: f64,

    /// IPD used when no gender hint is available (mm)
    pub default_ipd_mm: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            front_stability_frames: DEFAULT_FRONT_STABILITY_FRAMES,
            side_stability_frames: DEFAULT_SIDE_STABILITY_FRAMES,
            scan_frames: DEFAULT_SCAN_FRAMES,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
        }
    }
}

impl CaptureConfig {
    /// Countdown duration as a [`Duration`]
    #[must_use]
    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            front_yaw_threshold_deg: DEFAULT_FRONT_YAW_THRESHOLD,
            profile_yaw_threshold_deg: DEFAULT_PROFILE_YAW_THRESHOLD,
            min_ipd_fraction: DEFAULT_MIN_IPD_FRACTION,
            max_face_length_mm: DEFAULT_MAX_FACE_LENGTH_MM,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            male_ipd_mm: MALE_IPD_MM,
            female_ipd_mm: FEMALE_IPD_MM,
            default_ipd_mm: DEFAULT_IPD_MM,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid YAML for [`Config`]
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        // Capture pacing
        if self.capture.front_stability_frames == 0 || self.capture.side_stability_frames == 0 {
            return Err(Error::ConfigError(
                "Stability frame targets must be greater than 0".to_string(),
            ));
        }
        if self.capture.scan_frames == 0 {
            return Err(Error::ConfigError("Scan frame count must be greater than 0".to_string()));
        }

        // Pose thresholds
        let pose = &self.pose;
        if !(pose.front_yaw_threshold_deg > 0.0
            && pose.front_yaw_threshold_deg < pose.profile_yaw_threshold_deg
            && pose.profile_yaw_threshold_deg <= MAX_YAW_DEG)
        {
            return Err(Error::ConfigError(format!(
                "Yaw thresholds must satisfy 0 < front < profile <= {MAX_YAW_DEG}"
            )));
        }
        if !(pose.min_ipd_fraction > 0.0 && pose.min_ipd_fraction < 1.0) {
            return Err(Error::ConfigError(
                "Minimum IPD fraction must be between 0.0 and 1.0".to_string(),
            ));
        }
        if pose.max_face_length_mm <= 0.0 {
            return Err(Error::ConfigError("Face length ceiling must be positive".to_string()));
        }

        // Calibration constants
        let cal = &self.calibration;
        for (name, value) in [
            ("male_ipd_mm", cal.male_ipd_mm),
            ("female_ipd_mm", cal.female_ipd_mm),
            ("default_ipd_mm", cal.default_ipd_mm),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::ConfigError(format!("{name} must be a positive number")));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# mask-fit configuration

# Capture session pacing
capture:
  front_stability_frames: 20
  side_stability_frames: 10
  scan_frames: 90
  countdown_secs: 3

# Pose and validity thresholds
pose:
  front_yaw_threshold_deg: 10.0
  profile_yaw_threshold_deg: 35.0
  min_ipd_fraction: 0.10
  max_face_length_mm: 280.0

# Assumed interpupillary distances (mm)
calibration:
  male_ipd_mm: 64.0
  female_ipd_mm: 62.0
  default_ipd_mm: 63.0
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = Config::from_yaml("capture:\n  scan_frames: 30\n").unwrap();
        assert_eq!(parsed.capture.scan_frames, 30);
        assert_eq!(parsed.capture.front_stability_frames, 20);
        assert_eq!(parsed.pose, PoseConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.capture.scan_frames = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.pose.front_yaw_threshold_deg = 40.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.pose.min_ipd_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.calibration.female_ipd_mm = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            Config::from_yaml("capture: [not, a, map]"),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_countdown_duration() {
        assert_eq!(CaptureConfig::default().countdown(), Duration::from_secs(3));
    }
}
