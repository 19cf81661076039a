//! Mask size from an additive score over four frontal measurements.

use super::MaskSize;
use crate::measurement::FrontalMeasurement;

/// Two thresholds splitting one quantity into bands 1, 2 and 3
#[derive(Debug, Clone, Copy)]
struct Band {
    small_below: f64,
    medium_below: f64,
}

impl Band {
    fn score(self, value_mm: f64) -> u8 {
        if value_mm < self.small_below {
            1
        } else if value_mm < self.medium_below {
            2
        } else {
            3
        }
    }
}

const NOSE_WIDTH: Band = Band { small_below: 35.0, medium_below: 40.0 };
const FACE_LENGTH: Band = Band { small_below: 180.0, medium_below: 200.0 };
const FACE_WIDTH: Band = Band { small_below: 130.0, medium_below: 145.0 };
const MOUTH_WIDTH: Band = Band { small_below: 45.0, medium_below: 52.0 };

/// Highest total classified as small
pub const SMALL_MAX_SCORE: u8 = 6;
/// Highest total classified as medium
pub const MEDIUM_MAX_SCORE: u8 = 10;

/// Sum of the four band scores, in `4..=12`
#[must_use]
pub fn size_score(front: &FrontalMeasurement) -> u8 {
    NOSE_WIDTH.score(front.nose_width_mm)
        + FACE_LENGTH.score(front.face_length_mm)
        + FACE_WIDTH.score(front.face_width_mm)
        + MOUTH_WIDTH.score(front.mouth_width_mm)
}

/// `<= 6` is S, `<= 10` is M, anything above is L
#[must_use]
pub fn classify_size_score(total: u8) -> MaskSize {
    if total <= SMALL_MAX_SCORE {
        MaskSize::S
    } else if total <= MEDIUM_MAX_SCORE {
        MaskSize::M
    } else {
        MaskSize::L
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MEASUREMENT_CONFIDENCE;

    fn front(nose: f64, length: f64, width: f64, mouth: f64) -> FrontalMeasurement {
        FrontalMeasurement {
            ipd_px: 250.0,
            scale_factor_mm_per_px: 0.25,
            nose_width_mm: nose,
            face_length_mm: length,
            face_width_mm: width,
            philtrum_length_mm: 15.0,
            mouth_width_mm: mouth,
            bridge_width_mm: 32.0,
            chin_angle_deg: 120.0,
            confidence: MEASUREMENT_CONFIDENCE,
        }
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify_size_score(4), MaskSize::S);
        assert_eq!(classify_size_score(6), MaskSize::S);
        assert_eq!(classify_size_score(7), MaskSize::M);
        assert_eq!(classify_size_score(10), MaskSize::M);
        assert_eq!(classify_size_score(11), MaskSize::L);
        assert_eq!(classify_size_score(12), MaskSize::L);
    }

    #[test]
    fn test_band_edges_belong_to_upper_band() {
        assert_eq!(NOSE_WIDTH.score(34.9), 1);
        assert_eq!(NOSE_WIDTH.score(35.0), 2);
        assert_eq!(NOSE_WIDTH.score(40.0), 3);
    }

    #[test]
    fn test_size_score_range() {
        assert_eq!(size_score(&front(30.0, 170.0, 120.0, 40.0)), 4);
        assert_eq!(size_score(&front(38.0, 190.0, 140.0, 50.0)), 8);
        assert_eq!(size_score(&front(45.0, 220.0, 160.0, 60.0)), 12);
    }
}
