//! Landmark frames and the anatomical roles read from them.
//!
//! Frames arrive as MediaPipe Face Mesh output: an ordered list of points with
//! `x`/`y` normalized to the frame width/height and an optional relative `z`.
//! [`FaceLandmarks`] pulls the points this crate measures out of such a frame,
//! keyed by [`Landmark`] and converted to pixel units. Normalized and pixel
//! coordinates are distinct types so they cannot be mixed in a distance.

use crate::{constants::NUM_FACE_MESH_LANDMARKS, Error, Result};
use serde::{Deserialize, Serialize};

/// Normalized coordinates outside this range are assumed to already be pixels
const NORMALIZED_RANGE: std::ops::RangeInclusive<f64> = -0.5..=1.5;

/// A detector-space point with `x`/`y` normalized to `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl LandmarkPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Point with a relative depth component
    #[must_use]
    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Denormalize to pixels. Face Mesh depth shares the x scale.
    fn to_pixels(self, width: f64, height: f64) -> PixelPoint {
        PixelPoint {
            x: self.x * width,
            y: self.y * height,
            z: self.z.map(|z| z * width),
        }
    }
}

/// A point in frame pixel units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl PixelPoint {
    /// Euclidean distance; depth contributes only when both points carry it
    #[must_use]
    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = match (self.z, other.z) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        };
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Midpoint of two points
    #[must_use]
    pub fn midpoint(&self, other: &PixelPoint) -> PixelPoint {
        PixelPoint {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: match (self.z, other.z) {
                (Some(a), Some(b)) => Some((a + b) / 2.0),
                _ => None,
            },
        }
    }
}

/// One frame of detector output. An empty frame means no face was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<LandmarkPoint>,
}

impl LandmarkFrame {
    #[must_use]
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Frame with no detected face
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    /// Mutable access to the point for an anatomical role
    pub fn point_mut(&mut self, role: Landmark) -> Option<&mut LandmarkPoint> {
        self.points.get_mut(role.mesh_index())
    }
}

/// Anatomical roles used for measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Landmark {
    LeftEyeInner,
    LeftEyeOuter,
    RightEyeInner,
    RightEyeOuter,
    NoseTip,
    NoseBridge,
    NoseLeft,
    NoseRight,
    NoseBottom,
    UpperLip,
    LowerLip,
    MouthLeft,
    MouthRight,
    FaceTop,
    FaceLeft,
    FaceRight,
    Chin,
    JawLeft,
    JawRight,
}

impl Landmark {
    pub const COUNT: usize = 19;

    pub const ALL: [Landmark; Self::COUNT] = [
        Landmark::LeftEyeInner,
        Landmark::LeftEyeOuter,
        Landmark::RightEyeInner,
        Landmark::RightEyeOuter,
        Landmark::NoseTip,
        Landmark::NoseBridge,
        Landmark::NoseLeft,
        Landmark::NoseRight,
        Landmark::NoseBottom,
        Landmark::UpperLip,
        Landmark::LowerLip,
        Landmark::MouthLeft,
        Landmark::MouthRight,
        Landmark::FaceTop,
        Landmark::FaceLeft,
        Landmark::FaceRight,
        Landmark::Chin,
        Landmark::JawLeft,
        Landmark::JawRight,
    ];

    /// Index of this role in a MediaPipe Face Mesh landmark list.
    /// "Left" is image-left, which is the subject's right side.
    #[must_use]
    pub const fn mesh_index(self) -> usize {
        match self {
            Landmark::LeftEyeInner => 133,
            Landmark::LeftEyeOuter => 33,
            Landmark::RightEyeInner => 362,
            Landmark::RightEyeOuter => 263,
            Landmark::NoseTip => 1,
            Landmark::NoseBridge => 6,
            Landmark::NoseLeft => 98,
            Landmark::NoseRight => 327,
            Landmark::NoseBottom => 2,
            Landmark::UpperLip => 0,
            Landmark::LowerLip => 17,
            Landmark::MouthLeft => 61,
            Landmark::MouthRight => 291,
            Landmark::FaceTop => 10,
            Landmark::FaceLeft => 234,
            Landmark::FaceRight => 454,
            Landmark::Chin => 152,
            Landmark::JawLeft => 172,
            Landmark::JawRight => 397,
        }
    }
}

/// The measured roles of one face, in pixel units
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarks {
    points: [PixelPoint; Landmark::COUNT],
    frame_width: u32,
    frame_height: u32,
}

impl FaceLandmarks {
    /// Extract and denormalize the measured roles from a frame.
    ///
    /// Returns `Ok(None)` when the frame carries no landmarks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if:
    /// - Either frame dimension is zero
    /// - The frame has fewer points than a Face Mesh
    /// - A measured point is non-finite or not normalized
    pub fn from_frame(frame: &LandmarkFrame, width: u32, height: u32) -> Result<Option<Self>> {
        if frame.is_empty() {
            return Ok(None);
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "Frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if frame.len() < NUM_FACE_MESH_LANDMARKS {
            return Err(Error::InvalidInput(format!(
                "Expected at least {} landmarks, got {}",
                NUM_FACE_MESH_LANDMARKS,
                frame.len()
            )));
        }

        let (w, h) = (f64::from(width), f64::from(height));
        let mut points = [PixelPoint { x: 0.0, y: 0.0, z: None }; Landmark::COUNT];
        for role in Landmark::ALL {
            let p = frame.points[role.mesh_index()];
            if !(p.x.is_finite() && p.y.is_finite() && p.z.map_or(true, f64::is_finite)) {
                return Err(Error::InvalidInput(format!("Landmark {role:?} is not finite")));
            }
            if !NORMALIZED_RANGE.contains(&p.x) || !NORMALIZED_RANGE.contains(&p.y) {
                return Err(Error::InvalidInput(format!(
                    "Landmark {role:?} at ({}, {}) is not normalized",
                    p.x, p.y
                )));
            }
            points[role as usize] = p.to_pixels(w, h);
        }

        Ok(Some(Self {
            points,
            frame_width: width,
            frame_height: height,
        }))
    }

    /// Pixel position of a role
    #[must_use]
    pub fn get(&self, role: Landmark) -> PixelPoint {
        self.points[role as usize]
    }

    /// Pixel distance between two roles
    #[must_use]
    pub fn distance(&self, a: Landmark, b: Landmark) -> f64 {
        self.get(a).distance_to(&self.get(b))
    }

    /// Center of the image-left eye (midpoint of its corners)
    #[must_use]
    pub fn left_eye_center(&self) -> PixelPoint {
        self.get(Landmark::LeftEyeInner).midpoint(&self.get(Landmark::LeftEyeOuter))
    }

    /// Center of the image-right eye (midpoint of its corners)
    #[must_use]
    pub fn right_eye_center(&self) -> PixelPoint {
        self.get(Landmark::RightEyeInner).midpoint(&self.get(Landmark::RightEyeOuter))
    }

    /// Interpupillary distance in pixels, taken between the eye centers
    #[must_use]
    pub fn ipd_px(&self) -> f64 {
        self.left_eye_center().distance_to(&self.right_eye_center())
    }

    #[must_use]
    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    #[must_use]
    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    /// Length of the frame diagonal in pixels
    #[must_use]
    pub fn frame_diagonal(&self) -> f64 {
        f64::from(self.frame_width).hypot(f64::from(self.frame_height))
    }
}
