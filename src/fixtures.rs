//! Synthetic landmark frames with known physical dimensions.
//!
//! Faces are laid out in millimeters around the midpoint between the eyes and
//! projected into a portrait frame at `px_per_mm`. With the default 63 mm IPD
//! the calibrated measurements reproduce the input dimensions, which makes the
//! frames useful for tests, benchmarks and the CLI demo.

use crate::{
    constants::{DEFAULT_IPD_MM, NUM_FACE_MESH_LANDMARKS},
    landmarks::{Landmark, LandmarkFrame, LandmarkPoint},
};

/// Vertical offsets below the eye line (mm)
const NOSE_TIP_DROP_MM: f64 = 45.0;
const NOSE_BOTTOM_DROP_MM: f64 = 50.0;
const LOWER_LIP_HEIGHT_MM: f64 = 15.0;
const FACE_CONTOUR_DROP_MM: f64 = 10.0;
const JAW_RISE_MM: f64 = 25.0;

/// Share of the face length above the eye line
const FOREHEAD_SHARE: f64 = 0.45;

/// Jaw landmarks sit at this fraction of the face width from the midline
const JAW_WIDTH_SHARE: f64 = 0.38;

/// A face described by its physical dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticFace {
    pub ipd_mm: f64,
    pub bridge_width_mm: f64,
    pub nose_width_mm: f64,
    pub face_length_mm: f64,
    pub face_width_mm: f64,
    pub philtrum_mm: f64,
    pub mouth_width_mm: f64,
    /// Horizontal nose tip offset from the bridge; drives the yaw heuristic
    pub nose_tip_offset_mm: f64,
    /// Chin offset ahead of the nose bottom, in the facing direction
    pub jaw_projection_mm: f64,
    pub px_per_mm: f64,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for SyntheticFace {
    fn default() -> Self {
        Self {
            ipd_mm: DEFAULT_IPD_MM,
            bridge_width_mm: 32.0,
            nose_width_mm: 38.0,
            face_length_mm: 190.0,
            face_width_mm: 140.0,
            philtrum_mm: 15.0,
            mouth_width_mm: 50.0,
            nose_tip_offset_mm: 0.0,
            jaw_projection_mm: 0.0,
            px_per_mm: 4.0,
            frame_width: 1080,
            frame_height: 1920,
        }
    }
}

impl SyntheticFace {
    /// An average face looking straight at the camera
    #[must_use]
    pub fn frontal() -> Self {
        Self::default()
    }

    /// A face turned to the side. A negative `nose_tip_offset_mm` turns it
    /// the other way.
    #[must_use]
    pub fn profile(nose_tip_offset_mm: f64, jaw_projection_mm: f64) -> Self {
        Self {
            nose_tip_offset_mm,
            jaw_projection_mm,
            ..Self::default()
        }
    }

    /// Same face at a different camera distance
    #[must_use]
    pub fn with_px_per_mm(mut self, px_per_mm: f64) -> Self {
        self.px_per_mm = px_per_mm;
        self
    }

    /// Render the face as a normalized Face Mesh frame
    #[must_use]
    pub fn landmark_frame(&self) -> LandmarkFrame {
        let width = f64::from(self.frame_width);
        let height = f64::from(self.frame_height);
        let origin = (width / 2.0, height * 5.0 / 12.0);
        let normalize = |x_mm: f64, y_mm: f64| {
            LandmarkPoint::new(
                (origin.0 + x_mm * self.px_per_mm) / width,
                (origin.1 + y_mm * self.px_per_mm) / height,
            )
        };

        let facing = if self.nose_tip_offset_mm < 0.0 { -1.0 } else { 1.0 };
        let inner = self.bridge_width_mm / 2.0;
        let outer = self.ipd_mm - inner;
        let face_top = -FOREHEAD_SHARE * self.face_length_mm;
        let chin = face_top + self.face_length_mm;
        let upper_lip = NOSE_BOTTOM_DROP_MM + self.philtrum_mm;
        let jaw_x = JAW_WIDTH_SHARE * self.face_width_mm;

        let mut frame = LandmarkFrame::new(vec![normalize(0.0, 0.0); NUM_FACE_MESH_LANDMARKS]);
        for role in Landmark::ALL {
            let (x, y) = match role {
                Landmark::LeftEyeInner => (-inner, 0.0),
                Landmark::LeftEyeOuter => (-outer, 0.0),
                Landmark::RightEyeInner => (inner, 0.0),
                Landmark::RightEyeOuter => (outer, 0.0),
                Landmark::NoseTip => (self.nose_tip_offset_mm, NOSE_TIP_DROP_MM),
                Landmark::NoseBridge => (0.0, 0.0),
                Landmark::NoseLeft => (-self.nose_width_mm / 2.0, NOSE_TIP_DROP_MM),
                Landmark::NoseRight => (self.nose_width_mm / 2.0, NOSE_TIP_DROP_MM),
                Landmark::NoseBottom => (0.0, NOSE_BOTTOM_DROP_MM),
                Landmark::UpperLip => (0.0, upper_lip),
                Landmark::LowerLip => (0.0, upper_lip + LOWER_LIP_HEIGHT_MM),
                Landmark::MouthLeft => (-self.mouth_width_mm / 2.0, upper_lip + LOWER_LIP_HEIGHT_MM / 2.0),
                Landmark::MouthRight => (self.mouth_width_mm / 2.0, upper_lip + LOWER_LIP_HEIGHT_MM / 2.0),
                Landmark::FaceTop => (0.0, face_top),
                Landmark::FaceLeft => (-self.face_width_mm / 2.0, FACE_CONTOUR_DROP_MM),
                Landmark::FaceRight => (self.face_width_mm / 2.0, FACE_CONTOUR_DROP_MM),
                Landmark::Chin => (self.jaw_projection_mm * facing, chin),
                Landmark::JawLeft => (-jaw_x, chin - JAW_RISE_MM),
                Landmark::JawRight => (jaw_x, chin - JAW_RISE_MM),
            };
            if let Some(point) = frame.point_mut(role) {
                *point = normalize(x, y);
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_normalized() {
        let frame = SyntheticFace::frontal().landmark_frame();
        assert_eq!(frame.len(), NUM_FACE_MESH_LANDMARKS);
        assert!(frame
            .points()
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)));
    }

    #[test]
    fn test_profile_moves_nose_tip() {
        let frontal = SyntheticFace::frontal().landmark_frame();
        let profile = SyntheticFace::profile(24.0, 0.0).landmark_frame();
        let index = Landmark::NoseTip.mesh_index();
        assert!(profile.points()[index].x > frontal.points()[index].x);
    }
}
