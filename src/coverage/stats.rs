//! Pixel statistics over RGB buffers
//!
//! Classifies every pixel of an image as white or non-white, and non-white
//! pixels as black or not, then derives the non-white (ink) percentage.
//!
//! The per-pixel rule lives in [`PixelThresholds`]; backends only decide how
//! the buffer is walked. A backend that fails falls back to the scan backend,
//! so the result never depends on which backend ran.

use std::sync::Arc;

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{LineDetectionConfig, ThresholdOverrides};
use crate::coverage::backend::{self, BackendKind, StatsBackend};

/// White/black channel cutoffs applied to each pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelThresholds {
    /// Channel intensity at or below which a channel counts as black
    pub black: u8,
    /// Channel intensity at or above which a channel counts as white
    pub white: u8,
}

impl PixelThresholds {
    /// All three channels at or above the white cutoff
    #[inline]
    pub fn is_white(&self, [r, g, b]: [u8; 3]) -> bool {
        r >= self.white && g >= self.white && b >= self.white
    }

    /// All three channels at or below the black cutoff
    #[inline]
    pub fn is_black(&self, [r, g, b]: [u8; 3]) -> bool {
        r <= self.black && g <= self.black && b <= self.black
    }
}

impl From<&LineDetectionConfig> for PixelThresholds {
    fn from(config: &LineDetectionConfig) -> Self {
        Self {
            black: config.black_threshold,
            white: config.white_threshold,
        }
    }
}

/// Raw pixel counts produced by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelTally {
    pub total: u64,
    pub white: u64,
    pub non_white: u64,
    /// Black pixels among the non-white ones
    pub black: u64,
}

/// Coverage statistics for one image
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelStats {
    pub total_pixels: u64,
    pub white_count: u64,
    pub non_white_count: u64,
    pub black_count: u64,
    /// Non-white pixels as a percentage of all pixels (0.0-100.0)
    pub non_white_percentage: f64,
}

impl PixelStats {
    /// Statistics of an absent or zero-pixel image
    pub fn empty() -> Self {
        Self::default()
    }

    /// Black pixels over non-white pixels, `None` when nothing is inked
    pub fn black_ratio(&self) -> Option<f64> {
        if self.non_white_count == 0 {
            None
        } else {
            Some(self.black_count as f64 / self.non_white_count as f64)
        }
    }
}

impl From<PixelTally> for PixelStats {
    fn from(tally: PixelTally) -> Self {
        let non_white_percentage = if tally.total > 0 {
            (tally.non_white as f64 / tally.total as f64) * 100.0
        } else {
            0.0
        };

        Self {
            total_pixels: tally.total,
            white_count: tally.white,
            non_white_count: tally.non_white,
            black_count: tally.black,
            non_white_percentage,
        }
    }
}

/// Computes [`PixelStats`] with a configurable backend.
///
/// Cheap to clone; the backend is shared.
#[derive(Debug, Clone)]
pub struct PixelStatsEngine {
    config: LineDetectionConfig,
    backend: Arc<dyn StatsBackend>,
}

impl Default for PixelStatsEngine {
    fn default() -> Self {
        Self::new(LineDetectionConfig::default())
    }
}

impl PixelStatsEngine {
    /// Create an engine using the bulk array backend
    pub fn new(config: LineDetectionConfig) -> Self {
        Self::from_kind(config, BackendKind::default())
    }

    /// Create an engine using one of the built-in backends
    pub fn from_kind(config: LineDetectionConfig, kind: BackendKind) -> Self {
        Self::with_backend(config, kind.build())
    }

    /// Create an engine with a custom backend
    pub fn with_backend(config: LineDetectionConfig, backend: Arc<dyn StatsBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &LineDetectionConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Thresholds after applying per-call overrides
    pub fn thresholds(&self, overrides: &ThresholdOverrides) -> PixelThresholds {
        PixelThresholds {
            black: overrides.black_threshold.unwrap_or(self.config.black_threshold),
            white: overrides.white_threshold.unwrap_or(self.config.white_threshold),
        }
    }

    /// Compute coverage statistics for an RGB image.
    ///
    /// A zero-pixel image yields [`PixelStats::empty`].
    pub fn compute(&self, image: &RgbImage, overrides: &ThresholdOverrides) -> PixelStats {
        self.compute_with(image, self.thresholds(overrides))
    }

    /// Compute statistics for a decoded image of any color type.
    ///
    /// Alpha is dropped; `None` yields [`PixelStats::empty`].
    pub fn compute_dynamic(
        &self,
        image: Option<&DynamicImage>,
        overrides: &ThresholdOverrides,
    ) -> PixelStats {
        match image {
            Some(image) => self.compute(&image.to_rgb8(), overrides),
            None => PixelStats::empty(),
        }
    }

    /// Compute statistics with explicit thresholds
    pub fn compute_with(&self, image: &RgbImage, thresholds: PixelThresholds) -> PixelStats {
        if image.width() == 0 || image.height() == 0 {
            return PixelStats::empty();
        }

        let tally = match self.backend.tally(image, thresholds) {
            Ok(tally) => tally,
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "pixel backend failed, falling back to per-pixel scan"
                );
                backend::scan_tally(image, thresholds)
            }
        };

        let stats = PixelStats::from(tally);
        debug!(
            backend = self.backend.name(),
            width = image.width(),
            height = image.height(),
            non_white = stats.non_white_count,
            black = stats.black_count,
            percentage = stats.non_white_percentage,
            "computed pixel stats"
        );
        stats
    }
}
