//! Unit conversion between physical centimeters and raster pixels

use crate::constants::CM_PER_INCH;

/// Convert centimeters to whole pixels at `dpi`.
///
/// Truncates toward zero; negative or non-finite input yields 0.
#[inline]
pub fn cm_to_pixels(cm: f64, dpi: u32) -> u32 {
    (cm * f64::from(dpi) / CM_PER_INCH) as u32
}

/// Convert a pixel count to centimeters at `dpi`
#[inline]
pub fn pixels_to_cm(pixels: u32, dpi: u32) -> f64 {
    f64::from(pixels) * CM_PER_INCH / f64::from(dpi)
}

/// Physical size of a print in centimeters
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrintSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl PrintSize {
    pub fn new(width_cm: f64, height_cm: f64) -> Self {
        Self {
            width_cm,
            height_cm,
        }
    }

    /// Size of a raster rendered at `dpi`
    pub fn from_pixels(width_px: u32, height_px: u32, dpi: u32) -> Self {
        Self::new(pixels_to_cm(width_px, dpi), pixels_to_cm(height_px, dpi))
    }

    pub fn short_side(&self) -> f64 {
        self.width_cm.min(self.height_cm)
    }

    pub fn long_side(&self) -> f64 {
        self.width_cm.max(self.height_cm)
    }
}
