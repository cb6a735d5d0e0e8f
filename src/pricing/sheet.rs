//! Sheet size classification
//!
//! A print is first tested against the two fixed-size sheets (quarter and
//! half) in either orientation. Anything larger is assigned by its rounded
//! short side using a band table.
//!
//! # Band tables
//!
//! Two historical band tables exist for the roll sizes. The default one
//! sends every short side from 93 cm up to the large format roll:
//!
//! | short side (cm, rounded) | category |
//! |---|---|
//! | up to 74 | `Full` |
//! | 75 to 92 | `Extra90` |
//! | 93 to 105 | `LargeFormat` |
//! | above 105 | `LargeFormat` |
//!
//! [`SheetBands::with_extra_100`] restores the 100 cm roll for short sides
//! from 93 to 102 cm. The table is part of [`EngineConfig`] so a price list
//! can choose either.
//!
//! [`EngineConfig`]: crate::config::EngineConfig

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::constants::sheet_bands;
use crate::error::{QuoteError, Result};

/// Print sheet size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SheetCategory {
    /// Quarter sheet, about 50 x 35 cm
    #[serde(rename = "cuarto_pliego")]
    Quarter,
    /// Half sheet, about 70 x 50 cm
    #[serde(rename = "medio_pliego")]
    Half,
    /// Full sheet, 70 cm wide roll of any length
    #[serde(rename = "pliego")]
    Full,
    /// 90 cm wide roll
    #[serde(rename = "extra_90")]
    Extra90,
    /// 100 cm wide roll
    #[serde(rename = "extra_100")]
    Extra100,
    /// Anything wider
    #[serde(rename = "large_format")]
    LargeFormat,
}

impl SheetCategory {
    pub const ALL: [SheetCategory; 6] = [
        SheetCategory::Quarter,
        SheetCategory::Half,
        SheetCategory::Full,
        SheetCategory::Extra90,
        SheetCategory::Extra100,
        SheetCategory::LargeFormat,
    ];

    /// Stable key used in price tables and configuration files
    pub fn key(&self) -> &'static str {
        match self {
            SheetCategory::Quarter => "cuarto_pliego",
            SheetCategory::Half => "medio_pliego",
            SheetCategory::Full => "pliego",
            SheetCategory::Extra90 => "extra_90",
            SheetCategory::Extra100 => "extra_100",
            SheetCategory::LargeFormat => "large_format",
        }
    }
}

impl fmt::Display for SheetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SheetCategory {
    type Err = QuoteError;

    fn from_str(key: &str) -> Result<Self> {
        SheetCategory::ALL
            .iter()
            .copied()
            .find(|category| category.key() == key)
            .ok_or_else(|| QuoteError::unknown_category(key))
    }
}

/// Inclusive range of rounded short sides mapped to one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetBand {
    pub min_short_side: u32,
    pub max_short_side: u32,
    pub category: SheetCategory,
}

/// Ordered band table; first matching band wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetBands {
    pub bands: Vec<SheetBand>,
    /// Category for short sides past every band
    pub beyond: SheetCategory,
}

impl Default for SheetBands {
    fn default() -> Self {
        Self {
            bands: vec![
                SheetBand {
                    min_short_side: 0,
                    max_short_side: sheet_bands::FULL_MAX_SHORT_SIDE,
                    category: SheetCategory::Full,
                },
                SheetBand {
                    min_short_side: sheet_bands::FULL_MAX_SHORT_SIDE + 1,
                    max_short_side: sheet_bands::EXTRA_90_MAX_SHORT_SIDE,
                    category: SheetCategory::Extra90,
                },
                SheetBand {
                    min_short_side: sheet_bands::EXTRA_90_MAX_SHORT_SIDE + 1,
                    max_short_side: sheet_bands::LARGE_FORMAT_MAX_SHORT_SIDE,
                    category: SheetCategory::LargeFormat,
                },
            ],
            beyond: SheetCategory::LargeFormat,
        }
    }
}

impl SheetBands {
    /// Band table that prints 93-102 cm short sides on the 100 cm roll
    pub fn with_extra_100() -> Self {
        let mut table = Self::default();
        if let Some(band) = table
            .bands
            .iter_mut()
            .find(|band| band.category == SheetCategory::LargeFormat)
        {
            band.max_short_side = sheet_bands::EXTRA_100_MAX_SHORT_SIDE;
            band.category = SheetCategory::Extra100;
        }
        table
    }

    /// Category for a rounded short side
    pub fn lookup(&self, short_side: u32) -> SheetCategory {
        self.bands
            .iter()
            .find(|band| (band.min_short_side..=band.max_short_side).contains(&short_side))
            .map(|band| band.category)
            .unwrap_or(self.beyond)
    }

    /// Every category the table can return
    pub fn categories(&self) -> impl Iterator<Item = SheetCategory> + '_ {
        self.bands
            .iter()
            .map(|band| band.category)
            .chain(std::iter::once(self.beyond))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(band) = self
            .bands
            .iter()
            .find(|band| band.min_short_side > band.max_short_side)
        {
            return Err(QuoteError::invalid_config(format!(
                "band for '{}' starts at {} cm but ends at {} cm",
                band.category, band.min_short_side, band.max_short_side
            )));
        }
        Ok(())
    }
}

/// Selects the sheet category for a physical print size
#[derive(Debug, Clone, PartialEq)]
pub struct SheetClassifier {
    quarter: (f64, f64),
    half: (f64, f64),
    bands: SheetBands,
}

impl SheetClassifier {
    /// Build from the reference sizes and band table of a configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let quarter = config.sheet(SheetCategory::Quarter)?;
        let half = config.sheet(SheetCategory::Half)?;
        Ok(Self {
            quarter: (quarter.width_cm, quarter.height_cm),
            half: (half.width_cm, half.height_cm),
            bands: config.sheet_bands.clone(),
        })
    }

    /// Classify a print of `width_cm` x `height_cm`.
    ///
    /// Fails with `InvalidDimension` for non-positive or non-finite sides.
    pub fn classify(&self, width_cm: f64, height_cm: f64) -> Result<SheetCategory> {
        validate_side("width_cm", width_cm)?;
        validate_side("height_cm", height_cm)?;

        if fits_either_way(width_cm, height_cm, self.quarter) {
            return Ok(SheetCategory::Quarter);
        }
        if fits_either_way(width_cm, height_cm, self.half) {
            return Ok(SheetCategory::Half);
        }

        // Bands compare whole centimeters, rounded half to even
        let short_side = width_cm.min(height_cm).round_ties_even() as u32;
        let category = self.bands.lookup(short_side);
        debug!(width_cm, height_cm, short_side, %category, "classified sheet by band");
        Ok(category)
    }
}

fn validate_side(parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(QuoteError::invalid_dimension(parameter, value))
    }
}

fn fits_either_way(width: f64, height: f64, (ref_width, ref_height): (f64, f64)) -> bool {
    (width <= ref_width && height <= ref_height) || (height <= ref_width && width <= ref_height)
}
