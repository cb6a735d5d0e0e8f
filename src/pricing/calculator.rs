//! Coverage based price calculation
//!
//! Prices interpolate linearly between a category's `base_cost` (blank
//! sheet) and `full_cost` (fully inked sheet) in ten coverage steps. Sheets
//! cut from a roll pay proportionally for length past their reference
//! height, and every category rounds its result its own way.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, SheetSpec};
use crate::constants::coverage::{BAND_EDGES, EXTRA_90_FLAT_RATES};
use crate::coverage::LineType;
use crate::error::{QuoteError, Result};
use crate::pricing::sheet::SheetCategory;

/// Rounding applied to a final price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Keep the computed value
    Exact,
    /// Round to the nearest multiple, ties to even
    Nearest(u32),
}

impl Rounding {
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Rounding::Exact | Rounding::Nearest(0) => value,
            Rounding::Nearest(step) => {
                let step = f64::from(step);
                (value / step).round_ties_even() * step
            }
        }
    }
}

/// Index (0-10) of the coverage band containing `percentage`
pub fn coverage_band(percentage: f64) -> usize {
    BAND_EDGES.iter().take_while(|&&edge| percentage >= edge).count()
}

/// Interpolation factor (0.0-1.0) for a coverage percentage
pub fn coverage_factor(percentage: f64) -> f64 {
    coverage_band(percentage) as f64 / 10.0
}

/// Turns coverage and length into a price for a sheet category
#[derive(Debug, Clone)]
pub struct PriceCalculator {
    config: Arc<EngineConfig>,
}

impl PriceCalculator {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Price for `category` at `percentage` coverage and `long_side_cm` length.
    ///
    /// Percentages outside 0-100 are clamped. `Extra90` is priced from a
    /// flat per-band table with neither surcharge nor rounding.
    pub fn calculate_cost(
        &self,
        category: SheetCategory,
        percentage: f64,
        long_side_cm: f64,
    ) -> Result<f64> {
        if !percentage.is_finite() {
            return Err(QuoteError::invalid_dimension("non_white_percentage", percentage));
        }
        if !long_side_cm.is_finite() || long_side_cm <= 0.0 {
            return Err(QuoteError::invalid_dimension("long_side_cm", long_side_cm));
        }

        let spec = self.config.sheet(category)?;
        let percentage = percentage.clamp(0.0, 100.0);
        let band = coverage_band(percentage);

        if category == SheetCategory::Extra90 {
            let cost = EXTRA_90_FLAT_RATES[band];
            debug!(%category, percentage, band, cost, "flat rate price");
            return Ok(cost);
        }

        let factor = band as f64 / 10.0;
        let coverage_cost = spec.base_cost + (spec.full_cost - spec.base_cost) * factor;
        let cost = spec.rounding.apply(coverage_cost * length_multiplier(spec, long_side_cm));

        debug!(%category, percentage, band, long_side_cm, cost, "calculated price");
        Ok(cost)
    }

    /// [`calculate_cost`](Self::calculate_cost) with a category key
    pub fn calculate_cost_for_key(
        &self,
        key: &str,
        percentage: f64,
        long_side_cm: f64,
    ) -> Result<f64> {
        self.calculate_cost(key.parse()?, percentage, long_side_cm)
    }

    /// True when the category has a line art price entry
    pub fn supports_line_pricing(&self, category: SheetCategory) -> bool {
        self.config.line_costs.contains_key(&category)
    }

    /// True when `percentage` is low enough for line pricing
    pub fn within_line_band(&self, percentage: f64) -> bool {
        (0.0..=self.config.line_pricing_max_coverage).contains(&percentage)
    }

    /// Flat line art price, rounded by the category's rule
    pub fn line_cost(&self, category: SheetCategory, line_type: LineType) -> Result<f64> {
        let spec = self.config.sheet(category)?;
        let entry = self
            .config
            .line_costs
            .get(&category)
            .ok_or_else(|| QuoteError::unknown_category(category.key()))?;
        Ok(spec.rounding.apply(entry.cost_for(line_type)))
    }
}

/// Proportional surcharge for roll sheets longer than their reference height
fn length_multiplier(spec: &SheetSpec, long_side_cm: f64) -> f64 {
    if spec.flexible_height && long_side_cm > spec.height_cm {
        long_side_cm / spec.height_cm
    } else {
        1.0
    }
}
