//! # Print Quote
//!
//! A Rust crate for quoting print jobs from the artwork itself.
//!
//! This library estimates the price of a print by:
//! - Measuring ink coverage as the share of non-white pixels
//! - Telling black line art from color line art on low-coverage artwork
//! - Classifying the physical print size into a sheet category
//! - Pricing coverage and length from per-category tables
//!
//! Large-format material quotes, canvas placement and sheet imposition are
//! available alongside the sheet pricing.
//!
//! ## Example
//!
//! ```rust,no_run
//! use print_quote::{calculate_cost, classify_sheet, compute_pixel_stats, load_image};
//! use std::path::Path;
//!
//! let image = load_image(Path::new("poster.png"))?;
//! let stats = compute_pixel_stats(Some(&image), None, None);
//! let category = classify_sheet(70.0, 120.0)?;
//! let cost = calculate_cost(category.key(), stats.non_white_percentage, 120.0)?;
//! println!("{}: {:.0}", category, cost);
//! # Ok::<(), print_quote::QuoteError>(())
//! ```

use std::sync::Arc;

use image::DynamicImage;

pub mod config;
pub mod constants;
pub mod conversion;
pub mod coverage;
pub mod error;
pub mod image_loader;
pub mod layout;
pub mod pricing;
pub mod quote;

pub use config::{EngineConfig, LineCost, LineDetectionConfig, SheetSpec, ThresholdOverrides};
pub use conversion::{cm_to_pixels, pixels_to_cm, PrintSize};
pub use coverage::{is_color_image, LineType, PixelStats, PixelStatsEngine};
pub use error::{QuoteError, Result};
pub use image_loader::load_image;
pub use layout::{impose, Canvas, ImpositionPlan, PlacementMode, Rotation};
pub use pricing::{Material, MaterialQuote, Rounding, SheetBands, SheetCategory};
pub use quote::{BatchReport, CostQuote, PageRequest, QuoteEngine, SheetSelection};

/// Coverage statistics with the default thresholds, optionally overridden
///
/// An absent or zero-pixel image yields the zeroed record.
pub fn compute_pixel_stats(
    image: Option<&DynamicImage>,
    black_threshold: Option<u8>,
    white_threshold: Option<u8>,
) -> PixelStats {
    let overrides = ThresholdOverrides {
        black_threshold,
        white_threshold,
        min_black_ratio: None,
    };
    PixelStatsEngine::default().compute_dynamic(image, &overrides)
}

/// Black or color line art with the default thresholds
///
/// # Errors
///
/// Returns `QuoteError::InvalidParameter` if an overridden black ratio is
/// outside 0.0-1.0.
pub fn detect_line_type(
    image: Option<&DynamicImage>,
    overrides: &ThresholdOverrides,
) -> Result<LineType> {
    coverage::LineClassifier::default().detect_dynamic(image, overrides)
}

/// Sheet category for a print size with the default tables
pub fn classify_sheet(width_cm: f64, height_cm: f64) -> Result<SheetCategory> {
    pricing::SheetClassifier::from_config(&EngineConfig::default())?.classify(width_cm, height_cm)
}

/// Price for a category key with the default tables
///
/// # Errors
///
/// Returns `QuoteError` if:
/// - The key names no sheet category
/// - The percentage is not finite
/// - The long side is not a positive number
pub fn calculate_cost(key: &str, non_white_percentage: f64, long_side_cm: f64) -> Result<f64> {
    pricing::PriceCalculator::new(Arc::new(EngineConfig::default())).calculate_cost_for_key(
        key,
        non_white_percentage,
        long_side_cm,
    )
}
