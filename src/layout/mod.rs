//! Artwork placement and sheet imposition
//!
//! - [`canvas`]: rotates and sizes artwork on a print canvas and measures
//!   the canvas coverage that drives the price
//! - [`imposition`]: how many copies of a piece fit on a sheet

pub mod canvas;
pub mod imposition;

pub use canvas::{canvas_coverage, place_artwork, Canvas, Placement, PlacementMode, Rotation};
pub use imposition::{impose, ImpositionPlan};
