//! Ink coverage measurement module
//!
//! This module counts white, black and non-white pixels, decides whether
//! low-coverage artwork is black or color line art, and checks whether an
//! image carries any color at all.

pub mod backend;
pub mod line;
pub mod stats;
pub mod tone;

pub use backend::{BackendKind, BulkBackend, ScanBackend, StatsBackend};
pub use line::{LineClassifier, LineType};
pub use stats::{PixelStats, PixelStatsEngine, PixelTally, PixelThresholds};
pub use tone::is_color_image;
