//! Physical facial measurements derived from one frame's landmarks.
//!
//! Every distance is `pixel_distance * scale_factor`, rounded to 0.1 mm. The
//! frontal scale factor comes from the frame's own IPD; profile measurements
//! are taken with the scale frozen at the end of the frontal scan, because a
//! turned head foreshortens the IPD.

use crate::{
    buffer::Aggregate,
    calibration::{scale_factor, Gender},
    config::CalibrationConfig,
    constants::MEASUREMENT_CONFIDENCE,
    landmarks::{FaceLandmarks, Landmark, LandmarkFrame, PixelPoint},
    utils::{mean_of, round_tenth},
    Result,
};
use serde::{Deserialize, Serialize};

/// Measurements from a front-facing frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontalMeasurement {
    /// Eye-center distance in pixels, the calibration reference
    pub ipd_px: f64,
    /// Millimeters per pixel for this frame
    pub scale_factor_mm_per_px: f64,
    /// Nostril edge to nostril edge
    pub nose_width_mm: f64,
    /// Crown to chin
    pub face_length_mm: f64,
    /// Contour left to contour right
    pub face_width_mm: f64,
    /// Nose bottom to upper lip
    pub philtrum_length_mm: f64,
    /// Mouth corner to mouth corner
    pub mouth_width_mm: f64,
    /// Inner eye corner to inner eye corner
    pub bridge_width_mm: f64,
    /// Angle at the chin between the two jaw lines
    pub chin_angle_deg: f64,
    /// Fixed detector trust, not recomputed here
    pub confidence: f64,
}

/// Measurements from a profile-facing frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileMeasurement {
    /// Horizontal projection of the nose tip in front of the bridge
    pub nose_height_mm: f64,
    /// Horizontal offset of the chin ahead of the nose bottom;
    /// negative when the chin sits behind it
    pub jaw_projection_mm: f64,
}

/// Measure a front-facing face.
///
/// Returns `None` when the IPD is too small to calibrate against.
#[must_use]
pub fn measure_frontal(
    face: &FaceLandmarks,
    gender: Option<Gender>,
    calibration: &CalibrationConfig,
) -> Option<FrontalMeasurement> {
    let ipd_px = face.ipd_px();
    let scale = match scale_factor(ipd_px, gender, calibration) {
        Ok(scale) => scale,
        Err(e) => {
            log::debug!("Skipping frontal measurement: {e}");
            return None;
        }
    };
    let mm = |a: Landmark, b: Landmark| round_tenth(face.distance(a, b) * scale);

    Some(FrontalMeasurement {
        ipd_px,
        scale_factor_mm_per_px: scale,
        nose_width_mm: mm(Landmark::NoseLeft, Landmark::NoseRight),
        face_length_mm: mm(Landmark::FaceTop, Landmark::Chin),
        face_width_mm: mm(Landmark::FaceLeft, Landmark::FaceRight),
        philtrum_length_mm: mm(Landmark::NoseBottom, Landmark::UpperLip),
        mouth_width_mm: mm(Landmark::MouthLeft, Landmark::MouthRight),
        bridge_width_mm: mm(Landmark::LeftEyeInner, Landmark::RightEyeInner),
        chin_angle_deg: round_tenth(chin_angle(face)),
        confidence: MEASUREMENT_CONFIDENCE,
    })
}

/// Frame-level entry point: denormalize, then measure.
///
/// # Errors
///
/// Returns an error if the frame is malformed (see [`FaceLandmarks::from_frame`]).
pub fn extract_frontal(
    frame: &LandmarkFrame,
    width: u32,
    height: u32,
    gender: Option<Gender>,
    calibration: &CalibrationConfig,
) -> Result<Option<FrontalMeasurement>> {
    let face = FaceLandmarks::from_frame(frame, width, height)?;
    Ok(face.and_then(|face| measure_frontal(&face, gender, calibration)))
}

/// Measure a profile-facing face with a frozen scale factor.
///
/// Only horizontal offsets are used; the facing direction is taken from the
/// side of the bridge the nose tip falls on.
#[must_use]
pub fn measure_profile(face: &FaceLandmarks, scale_mm_per_px: f64) -> ProfileMeasurement {
    let tip = face.get(Landmark::NoseTip);
    let bridge = face.get(Landmark::NoseBridge);
    let facing = if tip.x < bridge.x { -1.0 } else { 1.0 };

    let nose_height_px = (tip.x - bridge.x).abs();
    let jaw_projection_px = (face.get(Landmark::Chin).x - face.get(Landmark::NoseBottom).x) * facing;

    ProfileMeasurement {
        nose_height_mm: round_tenth(nose_height_px * scale_mm_per_px),
        jaw_projection_mm: round_tenth(jaw_projection_px * scale_mm_per_px),
    }
}

/// Angle at the chin between the chin→jaw-left and chin→jaw-right vectors (degrees)
fn chin_angle(face: &FaceLandmarks) -> f64 {
    let chin = face.get(Landmark::Chin);
    let vector = |p: PixelPoint| (p.x - chin.x, p.y - chin.y);
    let (lx, ly) = vector(face.get(Landmark::JawLeft));
    let (rx, ry) = vector(face.get(Landmark::JawRight));

    let magnitudes = lx.hypot(ly) * rx.hypot(ry);
    if magnitudes <= f64::EPSILON {
        return 0.0;
    }
    let cos = ((lx * rx + ly * ry) / magnitudes).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

impl Aggregate for FrontalMeasurement {
    fn aggregate(records: &[Self]) -> Option<Self> {
        let rounded = |field: fn(&Self) -> f64| mean_of(records, field).map(round_tenth);

        Some(Self {
            ipd_px: mean_of(records, |m| m.ipd_px)?,
            scale_factor_mm_per_px: mean_of(records, |m| m.scale_factor_mm_per_px)?,
            nose_width_mm: rounded(|m| m.nose_width_mm)?,
            face_length_mm: rounded(|m| m.face_length_mm)?,
            face_width_mm: rounded(|m| m.face_width_mm)?,
            philtrum_length_mm: rounded(|m| m.philtrum_length_mm)?,
            mouth_width_mm: rounded(|m| m.mouth_width_mm)?,
            bridge_width_mm: rounded(|m| m.bridge_width_mm)?,
            chin_angle_deg: rounded(|m| m.chin_angle_deg)?,
            confidence: MEASUREMENT_CONFIDENCE,
        })
    }
}

impl Aggregate for ProfileMeasurement {
    fn aggregate(records: &[Self]) -> Option<Self> {
        Some(Self {
            nose_height_mm: round_tenth(mean_of(records, |m| m.nose_height_mm)?),
            jaw_projection_mm: round_tenth(mean_of(records, |m| m.jaw_projection_mm)?),
        })
    }
}
