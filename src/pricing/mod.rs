//! Sheet classification and pricing module
//!
//! This module maps physical print sizes to sheet categories and turns
//! coverage percentages into prices, plus the separate large-format
//! material price list.

pub mod calculator;
pub mod material;
pub mod sheet;

pub use calculator::{coverage_band, coverage_factor, PriceCalculator, Rounding};
pub use material::{Material, MaterialPricer, MaterialQuote};
pub use sheet::{SheetBand, SheetBands, SheetCategory, SheetClassifier};
