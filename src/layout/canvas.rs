//! Canvas placement
//!
//! Artwork is rotated, sized by a [`PlacementMode`] and centered on a canvas
//! of fixed physical size. Artwork larger than the canvas hangs off its
//! edges; only the visible part counts towards coverage, and coverage is
//! always relative to the whole canvas.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use tracing::debug;

use crate::config::ThresholdOverrides;
use crate::conversion::{cm_to_pixels, PrintSize};
use crate::coverage::PixelStatsEngine;
use crate::error::{QuoteError, Result};

/// Print canvas measured in pixels at a given resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

impl Canvas {
    /// Canvas of `width_cm` x `height_cm`, truncated to whole pixels
    pub fn new(width_cm: f64, height_cm: f64, dpi: u32) -> Result<Self> {
        for (parameter, value) in [("width_cm", width_cm), ("height_cm", height_cm)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(QuoteError::invalid_dimension(parameter, value));
            }
        }
        Self::from_pixels(
            cm_to_pixels(width_cm, dpi),
            cm_to_pixels(height_cm, dpi),
            dpi,
        )
    }

    pub fn from_pixels(width_px: u32, height_px: u32, dpi: u32) -> Result<Self> {
        if dpi == 0 {
            return Err(QuoteError::InvalidParameter {
                parameter: "dpi".into(),
                value: dpi.to_string(),
            });
        }
        if width_px == 0 || height_px == 0 {
            return Err(QuoteError::invalid_dimension(
                "canvas_pixels",
                f64::from(width_px.min(height_px)),
            ));
        }
        Ok(Self {
            width_px,
            height_px,
            dpi,
        })
    }

    /// Physical size recovered from the pixel size
    pub fn size(&self) -> PrintSize {
        PrintSize::from_pixels(self.width_px, self.height_px, self.dpi)
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width_px) * u64::from(self.height_px)
    }
}

/// Counter-clockwise rotation in quarter turns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    None,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Rotation for an angle in degrees; must be a multiple of 90
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            _ => Err(QuoteError::InvalidParameter {
                parameter: "rotation".into(),
                value: degrees.to_string(),
            }),
        }
    }

    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// One more quarter turn counter-clockwise
    pub fn turn_left(self) -> Self {
        match self {
            Rotation::None => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::None,
        }
    }

    /// One more quarter turn clockwise
    pub fn turn_right(self) -> Self {
        self.turn_left().turn_left().turn_left()
    }

    fn apply(&self, image: &RgbImage) -> RgbImage {
        // imageops rotates clockwise
        match self {
            Rotation::None => image.clone(),
            Rotation::Deg90 => imageops::rotate270(image),
            Rotation::Deg180 => imageops::rotate180(image),
            Rotation::Deg270 => imageops::rotate90(image),
        }
    }
}

/// How artwork is sized on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementMode {
    /// Largest size that fits, keeping the aspect ratio
    FitToCanvas,
    /// Keep the artwork's pixel size
    RealSize,
    /// Explicit physical size. With `keep_aspect` the width wins when both
    /// sides are given.
    CustomSize {
        width_cm: Option<f64>,
        height_cm: Option<f64>,
        keep_aspect: bool,
    },
}

/// Sized artwork and its top-left corner on the canvas
#[derive(Debug, Clone)]
pub struct Placement {
    pub image: RgbImage,
    /// May be negative when the artwork is larger than the canvas
    pub x: i64,
    pub y: i64,
}

impl Placement {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Rotate, size and center `artwork` on `canvas`
pub fn place_artwork(
    canvas: &Canvas,
    artwork: &DynamicImage,
    rotation: Rotation,
    mode: PlacementMode,
) -> Result<Placement> {
    let rotated = rotation.apply(&artwork.to_rgb8());
    let (source_w, source_h) = rotated.dimensions();
    if source_w == 0 || source_h == 0 {
        return Err(QuoteError::invalid_dimension("artwork_pixels", 0.0));
    }
    let aspect = f64::from(source_w) / f64::from(source_h);

    let (target_w, target_h) = match mode {
        PlacementMode::RealSize => (source_w, source_h),
        PlacementMode::FitToCanvas => {
            let canvas_aspect = f64::from(canvas.width_px) / f64::from(canvas.height_px);
            if aspect > canvas_aspect {
                let width = canvas.width_px;
                (width, (f64::from(width) / aspect) as u32)
            } else {
                let height = canvas.height_px;
                ((f64::from(height) * aspect) as u32, height)
            }
        }
        PlacementMode::CustomSize {
            width_cm,
            height_cm,
            keep_aspect,
        } => {
            let width_px = custom_side("custom_width_cm", width_cm, canvas.dpi)?;
            let height_px = custom_side("custom_height_cm", height_cm, canvas.dpi)?;
            match (width_px, height_px, keep_aspect) {
                (None, None, _) => (source_w, source_h),
                (Some(w), _, true) => (w, (f64::from(w) / aspect) as u32),
                (None, Some(h), true) => ((f64::from(h) * aspect) as u32, h),
                (w, h, false) => (w.unwrap_or(source_w), h.unwrap_or(source_h)),
            }
        }
    };

    if target_w == 0 || target_h == 0 {
        return Err(QuoteError::invalid_dimension(
            "artwork_pixels",
            f64::from(target_w.min(target_h)),
        ));
    }

    let image = if (target_w, target_h) == (source_w, source_h) {
        rotated
    } else {
        imageops::resize(&rotated, target_w, target_h, FilterType::Lanczos3)
    };

    let x = (i64::from(canvas.width_px) - i64::from(target_w)).div_euclid(2);
    let y = (i64::from(canvas.height_px) - i64::from(target_h)).div_euclid(2);

    debug!(
        rotation = rotation.degrees(),
        target_w, target_h, x, y, "placed artwork on canvas"
    );
    Ok(Placement { image, x, y })
}

fn custom_side(parameter: &str, value: Option<f64>, dpi: u32) -> Result<Option<u32>> {
    match value {
        None => Ok(None),
        Some(cm) if cm.is_finite() && cm > 0.0 => Ok(Some(cm_to_pixels(cm, dpi))),
        Some(cm) => Err(QuoteError::invalid_dimension(parameter, cm)),
    }
}

/// Non-white share of the canvas (0.0-100.0).
///
/// Counts the visible part of the placed artwork; the rest of the canvas is
/// blank.
pub fn canvas_coverage(
    canvas: &Canvas,
    placement: &Placement,
    stats: &PixelStatsEngine,
    overrides: &ThresholdOverrides,
) -> f64 {
    let left = placement.x.max(0);
    let top = placement.y.max(0);
    let right = (placement.x + i64::from(placement.width())).min(i64::from(canvas.width_px));
    let bottom = (placement.y + i64::from(placement.height())).min(i64::from(canvas.height_px));

    if right <= left || bottom <= top {
        return 0.0;
    }

    // All four values lie within the artwork, so they fit in u32
    let visible = imageops::crop_imm(
        &placement.image,
        (left - placement.x) as u32,
        (top - placement.y) as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    )
    .to_image();

    let inked = stats.compute(&visible, overrides).non_white_count;
    inked as f64 / canvas.pixel_count() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn black(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 0, 0])))
    }

    fn square_canvas() -> Canvas {
        Canvas::from_pixels(100, 100, 300).unwrap()
    }

    #[test]
    fn test_fit_wide_artwork() {
        let canvas = square_canvas();
        let placement =
            place_artwork(&canvas, &black(200, 100), Rotation::None, PlacementMode::FitToCanvas)
                .unwrap();
        assert_eq!((placement.width(), placement.height()), (100, 50));
        assert_eq!((placement.x, placement.y), (0, 25));

        let coverage = canvas_coverage(
            &canvas,
            &placement,
            &PixelStatsEngine::default(),
            &ThresholdOverrides::default(),
        );
        assert!((coverage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_real_size_overflow_is_clipped() {
        let canvas = square_canvas();
        let placement =
            place_artwork(&canvas, &black(300, 20), Rotation::None, PlacementMode::RealSize)
                .unwrap();
        assert_eq!((placement.x, placement.y), (-100, 40));

        let coverage = canvas_coverage(
            &canvas,
            &placement,
            &PixelStatsEngine::default(),
            &ThresholdOverrides::default(),
        );
        assert!((coverage - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_odd_overflow_floors_offset() {
        let canvas = Canvas::from_pixels(10, 10, 300).unwrap();
        let placement =
            place_artwork(&canvas, &black(13, 4), Rotation::None, PlacementMode::RealSize)
                .unwrap();
        assert_eq!(placement.x, -2);
        assert_eq!(placement.y, 3);
    }

    #[test]
    fn test_rotation_is_counter_clockwise() {
        let mut strip = RgbImage::from_pixel(2, 1, Rgb([255, 0, 0]));
        strip.put_pixel(1, 0, Rgb([0, 0, 255]));
        let canvas = square_canvas();

        let placement = place_artwork(
            &canvas,
            &DynamicImage::ImageRgb8(strip),
            Rotation::Deg90,
            PlacementMode::RealSize,
        )
        .unwrap();
        assert_eq!((placement.width(), placement.height()), (1, 2));
        assert_eq!(placement.image.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(placement.image.get_pixel(0, 1), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_rotation_steps() {
        assert_eq!(Rotation::from_degrees(-90).unwrap(), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(450).unwrap(), Rotation::Deg90);
        assert!(Rotation::from_degrees(45).is_err());
        assert_eq!(Rotation::None.turn_right(), Rotation::Deg270);
        assert_eq!(Rotation::Deg270.turn_left(), Rotation::None);
    }

    #[test]
    fn test_custom_size_keep_aspect() {
        // 2.54 cm is 300 px at 300 dpi
        let canvas = Canvas::from_pixels(1000, 1000, 300).unwrap();
        let by_width = PlacementMode::CustomSize {
            width_cm: Some(2.54),
            height_cm: Some(10.0),
            keep_aspect: true,
        };
        let placement = place_artwork(&canvas, &black(200, 100), Rotation::None, by_width).unwrap();
        assert_eq!((placement.width(), placement.height()), (300, 150));

        let by_height = PlacementMode::CustomSize {
            width_cm: None,
            height_cm: Some(2.54),
            keep_aspect: true,
        };
        let placement = place_artwork(&canvas, &black(200, 100), Rotation::None, by_height).unwrap();
        assert_eq!((placement.width(), placement.height()), (600, 300));
    }

    #[test]
    fn test_custom_size_free_sides() {
        let canvas = Canvas::from_pixels(1000, 1000, 300).unwrap();
        let mode = PlacementMode::CustomSize {
            width_cm: Some(2.54),
            height_cm: None,
            keep_aspect: false,
        };
        let placement = place_artwork(&canvas, &black(200, 100), Rotation::None, mode).unwrap();
        assert_eq!((placement.width(), placement.height()), (300, 100));

        let unset = PlacementMode::CustomSize {
            width_cm: None,
            height_cm: None,
            keep_aspect: true,
        };
        let placement = place_artwork(&canvas, &black(200, 100), Rotation::None, unset).unwrap();
        assert_eq!((placement.width(), placement.height()), (200, 100));
    }

    #[test]
    fn test_invalid_custom_size() {
        let canvas = square_canvas();
        let mode = PlacementMode::CustomSize {
            width_cm: Some(-1.0),
            height_cm: None,
            keep_aspect: true,
        };
        assert!(matches!(
            place_artwork(&canvas, &black(10, 10), Rotation::None, mode),
            Err(QuoteError::InvalidDimension { .. })
        ));

        // Too small to cover a single pixel
        let tiny = PlacementMode::CustomSize {
            width_cm: Some(0.001),
            height_cm: None,
            keep_aspect: true,
        };
        assert!(matches!(
            place_artwork(&canvas, &black(10, 10), Rotation::None, tiny),
            Err(QuoteError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_canvas_from_centimeters() {
        let canvas = Canvas::new(2.54, 5.08, 300).unwrap();
        assert_eq!((canvas.width_px, canvas.height_px), (300, 600));
        assert!((canvas.size().height_cm - 5.08).abs() < 1e-9);
        assert!(Canvas::new(0.0, 5.0, 300).is_err());
    }
}
