//! Pricing constants and reference values for coverage analysis
//!
//! This module contains compile-time constants used as defaults for
//! [`EngineConfig`](crate::config::EngineConfig) and the literal price
//! tables that are not configurable.

/// Default rendering resolution used to convert between pixels and centimeters
pub const DEFAULT_DPI: u32 = 300;

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Line art detection thresholds
pub mod line_detection {
    /// A channel at or below this intensity counts towards "black"
    pub const BLACK_THRESHOLD: u8 = 140;

    /// A channel at or above this intensity counts towards "white"
    pub const WHITE_THRESHOLD: u8 = 253;

    /// Fraction of non-white pixels that must be black for black line pricing
    pub const MIN_BLACK_RATIO: f64 = 0.97;

    /// Highest coverage percentage (inclusive) priced from the line table
    pub const LINE_PRICING_MAX_COVERAGE: f64 = 9.0;
}

/// Coverage banding shared by every sheet category
pub mod coverage {
    /// Lower edges of bands 1 through 10.
    ///
    /// Band 0 covers `[0, 6)` and band 10 covers `[95, 100]`; every band in
    /// between is ten points wide.
    pub const BAND_EDGES: [f64; 10] = [6.0, 15.0, 25.0, 35.0, 45.0, 55.0, 65.0, 75.0, 85.0, 95.0];

    /// Number of bands (factor steps 0.0, 0.1, ..., 1.0)
    pub const BAND_COUNT: usize = BAND_EDGES.len() + 1;

    /// Flat prices for the Extra 90 sheet, indexed by coverage band
    pub const EXTRA_90_FLAT_RATES: [f64; BAND_COUNT] = [
        10000.0, 12000.0, 14000.0, 16000.0, 18000.0, 20000.0, 22000.0, 24000.0, 26000.0,
        28000.0, 30000.0,
    ];
}

/// Sheet classification bands on the rounded short side (cm)
pub mod sheet_bands {
    /// Largest short side still printed on a full sheet
    pub const FULL_MAX_SHORT_SIDE: u32 = 74;

    /// Largest short side printed on the 90 cm roll
    pub const EXTRA_90_MAX_SHORT_SIDE: u32 = 92;

    /// Largest short side of the large format band
    pub const LARGE_FORMAT_MAX_SHORT_SIDE: u32 = 105;

    /// Largest short side printed on the 100 cm roll (alternate band table)
    pub const EXTRA_100_MAX_SHORT_SIDE: u32 = 102;
}

/// Rounding steps in currency units
pub mod rounding {
    /// Quarter sheets round to the nearest 500
    pub const QUARTER_STEP: u32 = 500;

    /// Flexible-height sheets round to the nearest 1000
    pub const FLEXIBLE_STEP: u32 = 1000;

    /// Material quotes round up to the next 1000
    pub const MATERIAL_STEP: f64 = 1000.0;
}

/// Large-format material pricing defaults (currency units)
pub mod materials {
    /// Plotting price per square meter for general materials
    pub const GENERAL_PLOTTING_PER_M2: f64 = 25000.0;

    /// Minimum plotting charge for general materials
    pub const GENERAL_PLOTTING_MIN: f64 = 10000.0;

    /// Plotting price per square meter for canvas
    pub const CANVAS_PLOTTING_PER_M2: f64 = 50000.0;

    /// Minimum plotting charge for canvas
    pub const CANVAS_PLOTTING_MIN: f64 = 12500.0;

    /// Minimum material charge for canvas
    pub const CANVAS_MATERIAL_MIN: f64 = 12500.0;

    /// Extra canvas added on each axis for stretching over a frame (cm)
    pub const CANVAS_FRAMING_MARGIN_CM: f64 = 10.0;

    /// Aluminium hanging tube price per linear meter
    pub const ALUMINUM_TUBE_PER_M: f64 = 6200.0;

    /// Smallest side accepted for any material (cm)
    pub const MIN_MEASURE_CM: f64 = 20.0;
}

/// Grayscale check defaults
pub mod tone {
    /// Summed channel deviation from luma above which an image counts as color
    pub const COLOR_TOLERANCE: u64 = 10;
}
