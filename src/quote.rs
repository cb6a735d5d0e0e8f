//! Quotation engine
//!
//! Ties the pieces together: measure coverage, pick a sheet, then price
//! either from the line art table or from the coverage interpolation.
//!
//! # Example
//!
//! ```no_run
//! use print_quote::{EngineConfig, PrintSize, QuoteEngine, SheetSelection, ThresholdOverrides};
//! use std::path::Path;
//!
//! let engine = QuoteEngine::new(EngineConfig::default())?;
//! let image = print_quote::load_image(Path::new("poster.png"))?;
//!
//! let quote = engine.quote(
//!     &image,
//!     PrintSize::new(70.0, 120.0),
//!     SheetSelection::Auto,
//!     &ThresholdOverrides::default(),
//! )?;
//! println!("{}: {}", quote.display_name, quote.cost);
//! # Ok::<(), print_quote::QuoteError>(())
//! ```

use std::sync::Arc;

use image::DynamicImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, ThresholdOverrides};
use crate::conversion::PrintSize;
use crate::coverage::{LineClassifier, LineType, PixelStats, PixelStatsEngine};
use crate::error::{QuoteError, Result};
use crate::layout::{canvas_coverage, Canvas, Placement};
use crate::pricing::{Material, MaterialPricer, MaterialQuote, PriceCalculator, SheetCategory, SheetClassifier};

/// How the sheet category of a quote is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetSelection {
    /// Classify the print's own size
    #[default]
    Auto,
    /// Print on this category; its reference size sets the length
    Fixed(SheetCategory),
}

/// Price of one print
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostQuote {
    pub category: SheetCategory,
    pub display_name: String,
    /// Non-white share used for pricing (0.0-100.0)
    pub coverage_percentage: f64,
    /// Length the surcharge was computed from
    pub long_side_cm: f64,
    pub cost: f64,
    /// Set when the print was priced as line art
    pub line_type: Option<LineType>,
    /// Counts over the measured artwork. For a canvas quote these cover the
    /// placed artwork only, while `coverage_percentage` is relative to the
    /// whole canvas.
    pub stats: PixelStats,
}

/// One page of a batch
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub label: String,
    pub image: DynamicImage,
    /// Physical size; derived from the pixel size at the configured DPI when unset
    pub size: Option<PrintSize>,
    pub selection: SheetSelection,
    pub overrides: ThresholdOverrides,
}

impl PageRequest {
    pub fn new(label: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            label: label.into(),
            image,
            size: None,
            selection: SheetSelection::Auto,
            overrides: ThresholdOverrides::default(),
        }
    }

    pub fn with_size(mut self, size: PrintSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_selection(mut self, selection: SheetSelection) -> Self {
        self.selection = selection;
        self
    }
}

/// Outcome of one batch page
#[derive(Debug)]
pub struct PageOutcome {
    pub index: usize,
    pub label: String,
    pub result: Result<CostQuote>,
}

/// Batch results in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub pages: Vec<PageOutcome>,
    /// Sum over the pages that were quoted
    pub total_cost: f64,
}

impl BatchReport {
    pub fn quotes(&self) -> impl Iterator<Item = (&PageOutcome, &CostQuote)> {
        self.pages
            .iter()
            .filter_map(|page| page.result.as_ref().ok().map(|quote| (page, quote)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PageOutcome, &QuoteError)> {
        self.pages
            .iter()
            .filter_map(|page| page.result.as_ref().err().map(|error| (page, error)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Stateless quotation engine over an immutable configuration.
///
/// Cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    config: Arc<EngineConfig>,
    stats: PixelStatsEngine,
    lines: LineClassifier,
    sheets: SheetClassifier,
    prices: PriceCalculator,
    materials: MaterialPricer,
}

impl QuoteEngine {
    /// Validate `config` and build an engine from it
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let stats = PixelStatsEngine::from_kind(config.line_detection, config.backend);
        let sheets = SheetClassifier::from_config(&config)?;
        debug!(backend = stats.backend_name(), dpi = config.dpi, "built quote engine");

        Ok(Self {
            lines: LineClassifier::new(stats.clone()),
            stats,
            sheets,
            prices: PriceCalculator::new(Arc::clone(&config)),
            materials: MaterialPricer::new(config.materials.clone()),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn compute_pixel_stats(
        &self,
        image: Option<&DynamicImage>,
        overrides: &ThresholdOverrides,
    ) -> PixelStats {
        self.stats.compute_dynamic(image, overrides)
    }

    pub fn detect_line_type(
        &self,
        image: Option<&DynamicImage>,
        overrides: &ThresholdOverrides,
    ) -> Result<LineType> {
        self.lines.detect_dynamic(image, overrides)
    }

    pub fn classify_sheet(&self, width_cm: f64, height_cm: f64) -> Result<SheetCategory> {
        self.sheets.classify(width_cm, height_cm)
    }

    pub fn calculate_cost(
        &self,
        category: SheetCategory,
        percentage: f64,
        long_side_cm: f64,
    ) -> Result<f64> {
        self.prices.calculate_cost(category, percentage, long_side_cm)
    }

    pub fn line_cost(&self, category: SheetCategory, line_type: LineType) -> Result<f64> {
        self.prices.line_cost(category, line_type)
    }

    pub fn quote_material(&self, material: Material, width_cm: f64, height_cm: f64) -> Result<MaterialQuote> {
        self.materials.quote(material, width_cm, height_cm)
    }

    /// Quote a print of `size` whose artwork is `image`
    pub fn quote(
        &self,
        image: &DynamicImage,
        size: PrintSize,
        selection: SheetSelection,
        overrides: &ThresholdOverrides,
    ) -> Result<CostQuote> {
        let min_black_ratio = self.resolve_ratio(overrides)?;
        let (category, long_side_cm) = self.select_sheet(size, selection)?;

        let stats = self.stats.compute(&image.to_rgb8(), overrides);
        self.price(category, long_side_cm, stats.non_white_percentage, stats, min_black_ratio)
    }

    /// Quote a canvas with placed artwork.
    ///
    /// Coverage is measured over the whole canvas; line art detection looks
    /// at the placed artwork only.
    pub fn quote_canvas(
        &self,
        canvas: &Canvas,
        placement: &Placement,
        overrides: &ThresholdOverrides,
    ) -> Result<CostQuote> {
        let min_black_ratio = self.resolve_ratio(overrides)?;
        let size = canvas.size();
        let category = self.sheets.classify(size.width_cm, size.height_cm)?;

        let coverage = canvas_coverage(canvas, placement, &self.stats, overrides);
        let stats = self.stats.compute(&placement.image, overrides);
        self.price(category, size.long_side(), coverage, stats, min_black_ratio)
    }

    /// Quote every page in parallel.
    ///
    /// A failing page is logged and reported; it never stops the others.
    pub fn quote_batch(&self, pages: &[PageRequest]) -> BatchReport {
        let outcomes: Vec<PageOutcome> = pages
            .par_iter()
            .enumerate()
            .map(|(index, page)| {
                let size = page.size.unwrap_or_else(|| {
                    PrintSize::from_pixels(page.image.width(), page.image.height(), self.config.dpi)
                });
                let result = self.quote(&page.image, size, page.selection, &page.overrides);
                if let Err(e) = &result {
                    warn!(page = index + 1, label = %page.label, error = %e, "failed to quote page");
                }
                PageOutcome {
                    index,
                    label: page.label.clone(),
                    result,
                }
            })
            .collect();

        let total_cost = outcomes
            .iter()
            .filter_map(|page| page.result.as_ref().ok())
            .map(|quote| quote.cost)
            .sum();

        let report = BatchReport {
            pages: outcomes,
            total_cost,
        };
        info!(
            pages = report.pages.len(),
            failed = report.failures().count(),
            total_cost,
            "quoted batch"
        );
        report
    }

    fn resolve_ratio(&self, overrides: &ThresholdOverrides) -> Result<f64> {
        Ok(self.config.line_detection.with_overrides(overrides)?.min_black_ratio)
    }

    fn select_sheet(&self, size: PrintSize, selection: SheetSelection) -> Result<(SheetCategory, f64)> {
        match selection {
            SheetSelection::Auto => {
                let category = self.sheets.classify(size.width_cm, size.height_cm)?;
                Ok((category, size.long_side()))
            }
            SheetSelection::Fixed(category) => {
                let spec = self.config.sheet(category)?;
                Ok((category, spec.width_cm.max(spec.height_cm)))
            }
        }
    }

    fn price(
        &self,
        category: SheetCategory,
        long_side_cm: f64,
        coverage: f64,
        stats: PixelStats,
        min_black_ratio: f64,
    ) -> Result<CostQuote> {
        let display_name = self.config.sheet(category)?.display_name.clone();

        let (cost, line_type) =
            if self.prices.within_line_band(coverage) && self.prices.supports_line_pricing(category) {
                let line_type = LineClassifier::classify(&stats, min_black_ratio);
                (self.prices.line_cost(category, line_type)?, Some(line_type))
            } else {
                (self.prices.calculate_cost(category, coverage, long_side_cm)?, None)
            };

        debug!(%category, coverage, long_side_cm, cost, ?line_type, "quoted print");
        Ok(CostQuote {
            category,
            display_name,
            coverage_percentage: coverage,
            long_side_cm,
            cost,
            line_type,
            stats,
        })
    }
}
