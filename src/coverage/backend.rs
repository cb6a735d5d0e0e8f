//! Pixel statistics backends
//!
//! Two ways to walk an RGB buffer with identical results:
//! - [`BulkBackend`]: builds whole-image masks with `ndarray`
//! - [`ScanBackend`]: visits pixels one at a time
//!
//! Both apply the rule in [`PixelThresholds`]; only the traversal differs.

use std::fmt;
use std::sync::Arc;

use image::RgbImage;
use ndarray::{Array1, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use crate::coverage::stats::{PixelTally, PixelThresholds};
use crate::error::{QuoteError, Result};

/// Strategy for counting white, non-white and black pixels
pub trait StatsBackend: Send + Sync + fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Count pixels of `image` against `thresholds`
    fn tally(&self, image: &RgbImage, thresholds: PixelThresholds) -> Result<PixelTally>;
}

/// Built-in backend selection, as stored in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Bulk,
    Scan,
}

impl BackendKind {
    pub fn build(self) -> Arc<dyn StatsBackend> {
        match self {
            BackendKind::Bulk => Arc::new(BulkBackend),
            BackendKind::Scan => Arc::new(ScanBackend),
        }
    }
}

/// Per-pixel traversal. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanBackend;

impl StatsBackend for ScanBackend {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn tally(&self, image: &RgbImage, thresholds: PixelThresholds) -> Result<PixelTally> {
        Ok(scan_tally(image, thresholds))
    }
}

/// Count pixels one at a time
pub fn scan_tally(image: &RgbImage, thresholds: PixelThresholds) -> PixelTally {
    let mut tally = PixelTally::default();

    for pixel in image.pixels() {
        tally.total += 1;
        if thresholds.is_white(pixel.0) {
            tally.white += 1;
            continue;
        }
        tally.non_white += 1;
        if thresholds.is_black(pixel.0) {
            tally.black += 1;
        }
    }

    tally
}

/// Whole-image mask traversal over an `ndarray` view of the buffer
#[derive(Debug, Clone, Copy, Default)]
pub struct BulkBackend;

impl BulkBackend {
    fn error(&self, message: impl Into<String>) -> QuoteError {
        QuoteError::BackendError {
            backend: self.name().to_string(),
            message: message.into(),
        }
    }
}

impl StatsBackend for BulkBackend {
    fn name(&self) -> &'static str {
        "bulk"
    }

    fn tally(&self, image: &RgbImage, thresholds: PixelThresholds) -> Result<PixelTally> {
        let pixel_count = image.width() as usize * image.height() as usize;
        let samples = image
            .as_raw()
            .get(..pixel_count * 3)
            .ok_or_else(|| self.error("pixel buffer shorter than its dimensions"))?;

        // One row per pixel, one column per channel
        let grid = ArrayView2::from_shape((pixel_count, 3), samples)
            .map_err(|e| self.error(e.to_string()))?;
        let (red, green, blue) = (grid.column(0), grid.column(1), grid.column(2));

        let white_mask: Array1<bool> = Zip::from(&red)
            .and(&green)
            .and(&blue)
            .map_collect(|&r, &g, &b| thresholds.is_white([r, g, b]));
        let black_mask: Array1<bool> = Zip::from(&red)
            .and(&green)
            .and(&blue)
            .map_collect(|&r, &g, &b| thresholds.is_black([r, g, b]));

        let white = white_mask.iter().filter(|&&is_white| is_white).count() as u64;
        let black = Zip::from(&white_mask)
            .and(&black_mask)
            .fold(0u64, |count, &is_white, &is_black| {
                count + u64::from(!is_white && is_black)
            });

        let total = pixel_count as u64;
        Ok(PixelTally {
            total,
            white,
            non_white: total - white,
            black,
        })
    }
}
