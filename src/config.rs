//! Configuration structures for the quotation engine.
//!
//! This module defines the price tables and tunable thresholds the engine
//! is built from. Everything here is immutable once an engine is
//! constructed; tests and callers substitute alternate tables by building
//! a different [`EngineConfig`].
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use print_quote::EngineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = EngineConfig::from_json_file(Path::new("prices.json"))?;
//!
//! // Or use defaults
//! let config = EngineConfig::default();
//! # Ok::<(), print_quote::QuoteError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`LineDetectionConfig`]: black/white thresholds and the black ratio cutoff
//! - [`SheetSpec`]: per-category reference size, base/full cost and rounding
//! - [`LineCost`]: flat prices for black and color line art
//! - [`SheetBands`]: short-side bands used after the fit checks
//! - [`MaterialPricingConfig`]: large-format material and plotting prices

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{self, line_detection, materials, rounding};
use crate::coverage::{BackendKind, LineType};
use crate::error::{QuoteError, Result};
use crate::pricing::{Material, Rounding, SheetBands, SheetCategory};

/// Price table keyed by sheet category
pub type CostTable = BTreeMap<SheetCategory, SheetSpec>;

/// Line art price table keyed by sheet category
pub type LineCostTable = BTreeMap<SheetCategory, LineCost>;

/// Complete engine configuration.
///
/// Can be serialized to/from JSON so price lists can be updated without a
/// rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Resolution used to convert pixel sizes to centimeters
    pub dpi: u32,

    /// Pixel statistics backend tried first
    #[serde(default)]
    pub backend: BackendKind,

    /// Thresholds shared by coverage measurement and line detection
    pub line_detection: LineDetectionConfig,

    /// Highest coverage percentage (inclusive) that switches to line pricing
    pub line_pricing_max_coverage: f64,

    /// Per-category attributes and price anchors
    pub sheets: CostTable,

    /// Flat line art prices; only categories listed here support line pricing
    pub line_costs: LineCostTable,

    /// Short-side bands consulted when no fixed-size sheet fits
    pub sheet_bands: SheetBands,

    /// Large-format material pricing
    pub materials: MaterialPricingConfig,
}

/// Thresholds for white/black pixel classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineDetectionConfig {
    /// All channels at or below this value make a non-white pixel black
    pub black_threshold: u8,

    /// All channels at or above this value make a pixel white
    pub white_threshold: u8,

    /// Minimum black / non-white ratio for black line art (0.0-1.0)
    pub min_black_ratio: f64,
}

/// Per-call overrides for [`LineDetectionConfig`].
///
/// Unset fields fall back to the engine's configured values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThresholdOverrides {
    pub black_threshold: Option<u8>,
    pub white_threshold: Option<u8>,
    pub min_black_ratio: Option<f64>,
}

/// Attributes of one sheet category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    /// Human readable name shown in quotes
    pub display_name: String,

    /// Reference width in centimeters
    pub width_cm: f64,

    /// Reference height in centimeters; the surcharge baseline for flexible sheets
    pub height_cm: f64,

    /// Price at 0% coverage
    pub base_cost: f64,

    /// Price at 100% coverage
    pub full_cost: f64,

    /// Printed from a roll that can be cut to any length
    pub flexible_height: bool,

    /// Rounding applied to the final price
    pub rounding: Rounding,
}

/// Flat prices for line art on one sheet category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCost {
    pub black_cost: f64,
    pub color_cost: f64,
}

/// Large-format material price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPricingConfig {
    /// Per-material price and width limit
    pub materials: BTreeMap<Material, MaterialSpec>,

    /// Plotting price per square meter for every material except canvas
    pub general_plotting_per_m2: f64,

    /// Minimum plotting charge for general materials
    pub general_plotting_min: f64,

    /// Plotting price per square meter for canvas
    pub canvas_plotting_per_m2: f64,

    /// Minimum plotting charge for canvas
    pub canvas_plotting_min: f64,

    /// Minimum material charge for canvas
    pub canvas_material_min: f64,

    /// Margin added to each canvas side for framing (cm)
    pub canvas_framing_margin_cm: f64,

    /// Hanging tube price per linear meter (banners)
    pub aluminum_tube_per_m: f64,

    /// Smallest accepted side (cm)
    pub min_measure_cm: f64,
}

/// Price and width limit of one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// Price per linear meter
    pub price_per_m: f64,

    /// Roll width; at least one side must fit within it (cm)
    pub max_width_cm: f64,
}

impl Default for LineDetectionConfig {
    fn default() -> Self {
        Self {
            black_threshold: line_detection::BLACK_THRESHOLD,
            white_threshold: line_detection::WHITE_THRESHOLD,
            min_black_ratio: line_detection::MIN_BLACK_RATIO,
        }
    }
}

impl LineDetectionConfig {
    /// Apply per-call overrides on top of these values
    pub fn with_overrides(&self, overrides: &ThresholdOverrides) -> Result<Self> {
        let resolved = Self {
            black_threshold: overrides.black_threshold.unwrap_or(self.black_threshold),
            white_threshold: overrides.white_threshold.unwrap_or(self.white_threshold),
            min_black_ratio: overrides.min_black_ratio.unwrap_or(self.min_black_ratio),
        };
        resolved.validate()?;
        Ok(resolved)
    }

    /// Check that the black ratio is a fraction
    pub fn validate(&self) -> Result<()> {
        if !self.min_black_ratio.is_finite() || !(0.0..=1.0).contains(&self.min_black_ratio) {
            return Err(QuoteError::InvalidParameter {
                parameter: "min_black_ratio".into(),
                value: self.min_black_ratio.to_string(),
            });
        }
        Ok(())
    }
}

impl ThresholdOverrides {
    /// Override only the white and black thresholds
    pub fn thresholds(black_threshold: u8, white_threshold: u8) -> Self {
        Self {
            black_threshold: Some(black_threshold),
            white_threshold: Some(white_threshold),
            min_black_ratio: None,
        }
    }
}

impl LineCost {
    /// Price for the given line type
    pub fn cost_for(&self, line_type: LineType) -> f64 {
        match line_type {
            LineType::Black => self.black_cost,
            LineType::Color => self.color_cost,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dpi: constants::DEFAULT_DPI,
            backend: BackendKind::default(),
            line_detection: LineDetectionConfig::default(),
            line_pricing_max_coverage: line_detection::LINE_PRICING_MAX_COVERAGE,
            sheets: default_cost_table(),
            line_costs: default_line_costs(),
            sheet_bands: SheetBands::default(),
            materials: MaterialPricingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Attributes of a category, or `UnknownCategory` if the table lacks it
    pub fn sheet(&self, category: SheetCategory) -> Result<&SheetSpec> {
        self.sheets
            .get(&category)
            .ok_or_else(|| QuoteError::unknown_category(category.key()))
    }

    /// Check cross-table invariants.
    ///
    /// Every category the classifier can return and every line price entry
    /// must have a sheet spec.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(QuoteError::invalid_config("dpi must be greater than zero"));
        }

        self.line_detection.validate()?;

        if !self.line_pricing_max_coverage.is_finite()
            || !(0.0..=100.0).contains(&self.line_pricing_max_coverage)
        {
            return Err(QuoteError::InvalidParameter {
                parameter: "line_pricing_max_coverage".into(),
                value: self.line_pricing_max_coverage.to_string(),
            });
        }

        for (category, spec) in &self.sheets {
            let dims_ok = [spec.width_cm, spec.height_cm]
                .iter()
                .all(|v| v.is_finite() && *v > 0.0);
            let costs_ok = [spec.base_cost, spec.full_cost]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0);
            if !dims_ok || !costs_ok {
                return Err(QuoteError::invalid_config(format!(
                    "sheet '{}' needs positive dimensions and non-negative costs",
                    category
                )));
            }
        }

        self.sheet(SheetCategory::Quarter)?;
        self.sheet(SheetCategory::Half)?;

        self.sheet_bands.validate()?;
        for category in self.sheet_bands.categories() {
            self.sheet(category)?;
        }

        for (category, line) in &self.line_costs {
            self.sheet(*category)?;
            let costs_ok = [line.black_cost, line.color_cost]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0);
            if !costs_ok {
                return Err(QuoteError::invalid_config(format!(
                    "line costs for '{}' must be non-negative",
                    category
                )));
            }
        }

        self.materials.validate()
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            QuoteError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            QuoteError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| QuoteError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            QuoteError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}

impl Default for MaterialPricingConfig {
    fn default() -> Self {
        let table = Material::ALL
            .iter()
            .map(|material| {
                let (price_per_m, max_width_cm) = match material {
                    Material::Vinyl => (13600.0, 130.0),
                    Material::Banner => (21700.0, 130.0),
                    Material::Photographic => (13000.0, 70.0),
                    Material::Coated => (8000.0, 130.0),
                    Material::Canvas => (83000.0, 125.0),
                    Material::Parchment => (6000.0, 90.0),
                    Material::VerticalBanner => (21700.0, 130.0),
                    Material::HorizontalBanner => (21700.0, 130.0),
                };
                (
                    *material,
                    MaterialSpec {
                        price_per_m,
                        max_width_cm,
                    },
                )
            })
            .collect();

        Self {
            materials: table,
            general_plotting_per_m2: materials::GENERAL_PLOTTING_PER_M2,
            general_plotting_min: materials::GENERAL_PLOTTING_MIN,
            canvas_plotting_per_m2: materials::CANVAS_PLOTTING_PER_M2,
            canvas_plotting_min: materials::CANVAS_PLOTTING_MIN,
            canvas_material_min: materials::CANVAS_MATERIAL_MIN,
            canvas_framing_margin_cm: materials::CANVAS_FRAMING_MARGIN_CM,
            aluminum_tube_per_m: materials::ALUMINUM_TUBE_PER_M,
            min_measure_cm: materials::MIN_MEASURE_CM,
        }
    }
}

impl MaterialPricingConfig {
    /// Price entry for a material
    pub fn spec(&self, material: Material) -> Result<&MaterialSpec> {
        self.materials
            .get(&material)
            .ok_or_else(|| QuoteError::invalid_config(format!("no price for material '{}'", material)))
    }

    fn validate(&self) -> Result<()> {
        let prices = [
            self.general_plotting_per_m2,
            self.general_plotting_min,
            self.canvas_plotting_per_m2,
            self.canvas_plotting_min,
            self.canvas_material_min,
            self.canvas_framing_margin_cm,
            self.aluminum_tube_per_m,
            self.min_measure_cm,
        ];
        if prices.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(QuoteError::invalid_config(
                "material prices and measures must be non-negative",
            ));
        }
        for (material, spec) in &self.materials {
            if !spec.price_per_m.is_finite()
                || spec.price_per_m < 0.0
                || !spec.max_width_cm.is_finite()
                || spec.max_width_cm <= 0.0
            {
                return Err(QuoteError::invalid_config(format!(
                    "material '{}' needs a non-negative price and a positive width",
                    material
                )));
            }
        }
        Ok(())
    }
}

fn default_cost_table() -> CostTable {
    let quarter = Rounding::Nearest(rounding::QUARTER_STEP);
    let flexible = Rounding::Nearest(rounding::FLEXIBLE_STEP);

    let rows = [
        (SheetCategory::Full, "Pliego (70cm Ancho x Alto Flexible)", 72.0, 102.0, 7000.0, 17500.0, true, flexible),
        (SheetCategory::Half, "Medio Pliego (70x50 cm)", 73.0, 54.0, 4000.0, 9000.0, false, Rounding::Exact),
        (SheetCategory::Quarter, "Cuarto Pliego (50x35 cm)", 52.0, 36.0, 3000.0, 5000.0, false, quarter),
        (SheetCategory::Extra90, "Extra 90 cm (90cm Ancho x Alto Flexible)", 90.0, 100.0, 9000.0, 23000.0, true, flexible),
        (SheetCategory::Extra100, "Extra 100 cm (100cm Ancho x Alto Flexible)", 100.0, 100.0, 10000.0, 27000.0, true, flexible),
        (SheetCategory::LargeFormat, "Formato Grande (Ancho > 100cm, Alto Flexible)", 100.0, 100.0, 12000.0, 30000.0, true, flexible),
    ];

    rows.into_iter()
        .map(|(category, name, width_cm, height_cm, base_cost, full_cost, flexible_height, rounding)| {
            (
                category,
                SheetSpec {
                    display_name: name.to_string(),
                    width_cm,
                    height_cm,
                    base_cost,
                    full_cost,
                    flexible_height,
                    rounding,
                },
            )
        })
        .collect()
}

fn default_line_costs() -> LineCostTable {
    [
        (SheetCategory::Full, 6000.0, 7000.0),
        (SheetCategory::Half, 3500.0, 4000.0),
        (SheetCategory::Quarter, 2500.0, 3000.0),
    ]
    .into_iter()
    .map(|(category, black_cost, color_cost)| {
        (
            category,
            LineCost {
                black_cost,
                color_cost,
            },
        )
    })
    .collect()
}
