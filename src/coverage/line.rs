//! Line art classification
//!
//! Low-coverage artwork (logos, line drawings) is priced from a flat table
//! that distinguishes black line art from color line art. The decision uses
//! the share of black pixels among the inked (non-white) ones.

use std::fmt;

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ThresholdOverrides;
use crate::coverage::stats::{PixelStats, PixelStatsEngine};
use crate::error::Result;

/// Verdict for line art pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Black,
    Color,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Black => "black",
            LineType::Color => "color",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides between black and color line art
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    stats: PixelStatsEngine,
}

impl LineClassifier {
    pub fn new(stats: PixelStatsEngine) -> Self {
        Self { stats }
    }

    /// Classify from already computed statistics.
    ///
    /// An image with no inked pixels is `Color`.
    pub fn classify(stats: &PixelStats, min_black_ratio: f64) -> LineType {
        match stats.black_ratio() {
            Some(ratio) if ratio >= min_black_ratio => LineType::Black,
            _ => LineType::Color,
        }
    }

    /// Classify an RGB image.
    ///
    /// Fails only when the overridden `min_black_ratio` is not a fraction.
    pub fn detect(&self, image: &RgbImage, overrides: &ThresholdOverrides) -> Result<LineType> {
        let config = self.stats.config().with_overrides(overrides)?;
        let stats = self.stats.compute(image, overrides);
        let line_type = Self::classify(&stats, config.min_black_ratio);

        debug!(
            non_white = stats.non_white_count,
            black = stats.black_count,
            min_black_ratio = config.min_black_ratio,
            %line_type,
            "classified line art"
        );
        Ok(line_type)
    }

    /// Classify a decoded image; `None` is `Color`
    pub fn detect_dynamic(
        &self,
        image: Option<&DynamicImage>,
        overrides: &ThresholdOverrides,
    ) -> Result<LineType> {
        match image {
            Some(image) => self.detect(&image.to_rgb8(), overrides),
            None => {
                self.stats.config().with_overrides(overrides)?;
                Ok(LineType::Color)
            }
        }
    }
}
