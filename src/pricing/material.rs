//! Large-format material quotes
//!
//! Roll materials are charged for plotting by area plus material by the
//! linear meter. Canvas has its own rates and a framing margin, and banners
//! add hanging tubes when the requested orientation matches. Every partial
//! price is rounded up to the next 1000.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MaterialPricingConfig;
use crate::constants::rounding::MATERIAL_STEP;
use crate::error::{QuoteError, Result};

/// Printable large-format material
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Vinyl,
    Banner,
    Photographic,
    /// Coated paper
    Coated,
    Canvas,
    Parchment,
    VerticalBanner,
    HorizontalBanner,
}

impl Material {
    pub const ALL: [Material; 8] = [
        Material::Vinyl,
        Material::Banner,
        Material::Photographic,
        Material::Coated,
        Material::Canvas,
        Material::Parchment,
        Material::VerticalBanner,
        Material::HorizontalBanner,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Material::Vinyl => "Vinyl",
            Material::Banner => "Banner",
            Material::Photographic => "Photographic paper",
            Material::Coated => "Coated paper",
            Material::Canvas => "Canvas",
            Material::Parchment => "Parchment",
            Material::VerticalBanner => "Vertical banner",
            Material::HorizontalBanner => "Horizontal banner",
        }
    }

    fn has_tubes(&self, width_cm: f64, height_cm: f64) -> bool {
        match self {
            Material::VerticalBanner => width_cm <= height_cm,
            Material::HorizontalBanner => width_cm >= height_cm,
            _ => false,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Itemized material quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialQuote {
    pub material: Material,
    pub width_cm: f64,
    pub height_cm: f64,
    pub plotting_cost: f64,
    pub material_cost: f64,
    /// Hanging tubes; zero for everything but banners
    pub tube_cost: f64,
    pub total: f64,
}

/// Prices large-format prints from a [`MaterialPricingConfig`]
#[derive(Debug, Clone)]
pub struct MaterialPricer {
    config: MaterialPricingConfig,
}

impl MaterialPricer {
    pub fn new(config: MaterialPricingConfig) -> Self {
        Self { config }
    }

    /// Reject measures the material cannot be printed at.
    ///
    /// Both sides must reach the minimum measure, banners must match their
    /// orientation and at least one side must fit the roll width.
    pub fn validate_measures(&self, material: Material, width_cm: f64, height_cm: f64) -> Result<()> {
        for (parameter, value) in [("width_cm", width_cm), ("height_cm", height_cm)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(QuoteError::invalid_dimension(parameter, value));
            }
        }

        let unsupported = |reason: String| QuoteError::UnsupportedMeasure {
            material: material.to_string(),
            reason,
        };

        let min = self.config.min_measure_cm;
        if width_cm < min || height_cm < min {
            return Err(unsupported(format!("both sides must be at least {} cm", min)));
        }
        if material == Material::VerticalBanner && width_cm > height_cm {
            return Err(unsupported("width must not exceed height".into()));
        }
        if material == Material::HorizontalBanner && height_cm > width_cm {
            return Err(unsupported("height must not exceed width".into()));
        }

        let max_width = self.config.spec(material)?.max_width_cm;
        if width_cm > max_width && height_cm > max_width {
            return Err(unsupported(format!(
                "one side must be at most {} cm",
                max_width
            )));
        }
        Ok(())
    }

    /// Validate and price a print of `width_cm` x `height_cm`
    pub fn quote(&self, material: Material, width_cm: f64, height_cm: f64) -> Result<MaterialQuote> {
        self.validate_measures(material, width_cm, height_cm)?;

        let quote = if material == Material::Canvas {
            self.canvas_quote(width_cm, height_cm)?
        } else {
            self.general_quote(material, width_cm, height_cm)?
        };

        debug!(
            %material,
            width_cm,
            height_cm,
            total = quote.total,
            "quoted material"
        );
        Ok(quote)
    }

    fn general_quote(&self, material: Material, width_cm: f64, height_cm: f64) -> Result<MaterialQuote> {
        let spec = self.config.spec(material)?;
        let area_m2 = (width_cm / 100.0) * (height_cm / 100.0);

        let plotting_cost =
            ceil_to_step(area_m2 * self.config.general_plotting_per_m2).max(self.config.general_plotting_min);

        // Meters of roll: the side past the roll width, else the shorter side
        let run_cm = if width_cm > spec.max_width_cm {
            width_cm
        } else if height_cm > spec.max_width_cm {
            height_cm
        } else {
            width_cm.min(height_cm)
        };
        let material_cost = ceil_to_step((run_cm / 100.0) * spec.price_per_m);

        let tube_cost = if material.has_tubes(width_cm, height_cm) {
            ceil_to_step((width_cm / 100.0) * self.config.aluminum_tube_per_m * 2.0)
        } else {
            0.0
        };

        Ok(MaterialQuote {
            material,
            width_cm,
            height_cm,
            plotting_cost,
            material_cost,
            tube_cost,
            total: plotting_cost + material_cost + tube_cost,
        })
    }

    fn canvas_quote(&self, width_cm: f64, height_cm: f64) -> Result<MaterialQuote> {
        let spec = self.config.spec(Material::Canvas)?;
        let margin = self.config.canvas_framing_margin_cm;

        let plotting_cost = ceil_to_step(
            (width_cm / 100.0) * (height_cm / 100.0) * self.config.canvas_plotting_per_m2,
        )
        .max(self.config.canvas_plotting_min);

        let material_cost = ceil_to_step(
            ((width_cm + margin) / 100.0) * ((height_cm + margin) / 100.0) * spec.price_per_m,
        )
        .max(self.config.canvas_material_min);

        Ok(MaterialQuote {
            material: Material::Canvas,
            width_cm,
            height_cm,
            plotting_cost,
            material_cost,
            tube_cost: 0.0,
            total: plotting_cost + material_cost,
        })
    }
}

fn ceil_to_step(value: f64) -> f64 {
    (value / MATERIAL_STEP).ceil() * MATERIAL_STEP
}
