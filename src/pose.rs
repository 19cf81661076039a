//! Yaw estimation and per-frame pose validation.

use crate::{
    config::PoseConfig,
    constants::MAX_YAW_DEG,
    landmarks::{FaceLandmarks, Landmark},
};
use serde::{Deserialize, Serialize};

/// Approximate head yaw in degrees from 2D landmark asymmetry.
///
/// Compares the horizontal distance from the nose tip to each eye's outer
/// corner and maps `(left - right) / (left + right)` linearly onto ±90°. This
/// is not a 3D pose solve. The sign is positive when the nose tip moves toward
/// the image-right eye; for a mirrored preview that is the subject turning to
/// their left.
#[must_use]
pub fn estimate_yaw(face: &FaceLandmarks) -> f64 {
    let nose_x = face.get(Landmark::NoseTip).x;
    let dist_left = (nose_x - face.get(Landmark::LeftEyeOuter).x).abs();
    let dist_right = (nose_x - face.get(Landmark::RightEyeOuter).x).abs();

    let total = dist_left + dist_right;
    if total <= f64::EPSILON {
        return 0.0;
    }
    (dist_left - dist_right) / total * MAX_YAW_DEG
}

/// Pose and validity verdict for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseCheck {
    pub yaw_deg: f64,
    pub front_facing: bool,
    pub profile_facing: bool,
    /// Face is large enough in frame for a trustworthy calibration
    pub size_valid: bool,
}

/// Classifies frames against the configured thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseValidator {
    config: PoseConfig,
}

impl PoseValidator {
    #[must_use]
    pub fn new(config: PoseConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PoseConfig {
        &self.config
    }

    /// `|yaw| < front threshold`
    #[must_use]
    pub fn is_front_facing(&self, yaw_deg: f64) -> bool {
        yaw_deg.abs() < self.config.front_yaw_threshold_deg
    }

    /// `|yaw| > profile threshold`
    #[must_use]
    pub fn is_profile_facing(&self, yaw_deg: f64) -> bool {
        yaw_deg.abs() > self.config.profile_yaw_threshold_deg
    }

    /// The IPD must exceed the minimum fraction of the frame diagonal.
    /// Smaller faces are too far away and would be over-scaled.
    #[must_use]
    pub fn is_face_size_valid(&self, ipd_px: f64, diagonal_px: f64) -> bool {
        diagonal_px > 0.0 && ipd_px / diagonal_px > self.config.min_ipd_fraction
    }

    /// Face lengths above the ceiling are camera artifacts
    #[must_use]
    pub fn is_face_length_in_range(&self, face_length_mm: f64) -> bool {
        face_length_mm <= self.config.max_face_length_mm
    }

    /// Full verdict for one face
    #[must_use]
    pub fn check(&self, face: &FaceLandmarks) -> PoseCheck {
        let yaw_deg = estimate_yaw(face);
        PoseCheck {
            yaw_deg,
            front_facing: self.is_front_facing(yaw_deg),
            profile_facing: self.is_profile_facing(yaw_deg),
            size_valid: self.is_face_size_valid(face.ipd_px(), face.frame_diagonal()),
        }
    }
}
