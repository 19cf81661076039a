//! Pixel-to-millimeter calibration from the interpupillary distance.

use crate::{config::CalibrationConfig, constants::EPSILON, Error, Result};
use serde::{Deserialize, Serialize};

/// Gender hint used to pick the assumed IPD
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl CalibrationConfig {
    /// Assumed real-world IPD for a gender hint
    #[must_use]
    pub fn assumed_ipd_mm(&self, gender: Option<Gender>) -> f64 {
        match gender {
            Some(Gender::Male) => self.male_ipd_mm,
            Some(Gender::Female) => self.female_ipd_mm,
            Some(Gender::Unspecified) | None => self.default_ipd_mm,
        }
    }
}

/// Millimeters per pixel given an observed IPD in pixels
///
/// # Errors
///
/// Returns [`Error::Calibration`] if `ipd_px` is non-finite or not meaningfully
/// above zero, so no NaN or infinite scale can reach a measurement.
pub fn scale_factor(ipd_px: f64, gender: Option<Gender>, config: &CalibrationConfig) -> Result<f64> {
    if !ipd_px.is_finite() || ipd_px <= EPSILON {
        return Err(Error::Calibration(format!("Degenerate IPD of {ipd_px} px")));
    }
    Ok(config.assumed_ipd_mm(gender) / ipd_px)
}
