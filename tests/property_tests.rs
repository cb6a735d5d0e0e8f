//! Property-Based Tests
//!
//! Tests using property-based testing (proptest) to verify invariants:
//! - Pixel counts are consistent and backend independent
//! - Unit conversion stays within one pixel
//! - Classification and pricing are well behaved over their whole domain
//! - Imposition and material quotes respect their bounds

use image::RgbImage;
use print_quote::config::{LineDetectionConfig, MaterialPricingConfig, ThresholdOverrides};
use print_quote::coverage::{BackendKind, LineClassifier, LineType, PixelStats, PixelStatsEngine};
use print_quote::pricing::MaterialPricer;
use print_quote::{
    cm_to_pixels, impose, pixels_to_cm, EngineConfig, Material, QuoteEngine, SheetCategory,
};
use proptest::prelude::*;

fn arbitrary_image() -> impl Strategy<Value = RgbImage> {
    (1u32..24, 1u32..24).prop_flat_map(|(width, height)| {
        prop::collection::vec(any::<u8>(), (width * height * 3) as usize).prop_map(move |raw| {
            RgbImage::from_raw(width, height, raw).expect("buffer sized from dimensions")
        })
    })
}

// ============================================================================
// Pixel Statistics Properties
// ============================================================================

/// Property: bulk and scan backends count exactly the same pixels
#[test]
fn proptest_backends_agree() {
    proptest!(|(image in arbitrary_image(), black in any::<u8>(), white in any::<u8>())| {
        let overrides = ThresholdOverrides::thresholds(black, white);
        let bulk = PixelStatsEngine::from_kind(LineDetectionConfig::default(), BackendKind::Bulk);
        let scan = PixelStatsEngine::from_kind(LineDetectionConfig::default(), BackendKind::Scan);

        prop_assert_eq!(bulk.compute(&image, &overrides), scan.compute(&image, &overrides));
    });
}

/// Property: counts partition the image and the percentage stays in range
#[test]
fn proptest_count_invariants() {
    proptest!(|(image in arbitrary_image())| {
        let stats = PixelStatsEngine::default().compute(&image, &ThresholdOverrides::default());

        prop_assert_eq!(stats.total_pixels, u64::from(image.width() * image.height()));
        prop_assert_eq!(stats.white_count + stats.non_white_count, stats.total_pixels);
        prop_assert!(stats.black_count <= stats.non_white_count);
        prop_assert!((0.0..=100.0).contains(&stats.non_white_percentage));
    });
}

/// Property: turning more inked pixels black never turns black line art into color
#[test]
fn proptest_line_type_monotonic() {
    proptest!(|(non_white in 1u64..10_000, black in 0u64..10_000, ratio in 0.0f64..=1.0)| {
        let black = black.min(non_white);
        let stats = |black_count| PixelStats {
            total_pixels: non_white * 2,
            white_count: non_white,
            non_white_count: non_white,
            black_count,
            non_white_percentage: 50.0,
        };

        let before = LineClassifier::classify(&stats(black), ratio);
        let after = LineClassifier::classify(&stats((black + 1).min(non_white)), ratio);
        prop_assert!(!(before == LineType::Black && after == LineType::Color));
    });
}

// ============================================================================
// Conversion Properties
// ============================================================================

/// Property: converting to pixels and back loses less than one pixel
#[test]
fn proptest_conversion_within_one_pixel() {
    proptest!(|(cm in 0.0f64..5000.0, dpi in 72u32..1200)| {
        let back = pixels_to_cm(cm_to_pixels(cm, dpi), dpi);
        let difference = cm - back;
        prop_assert!(difference > -1e-9);
        prop_assert!(difference < pixels_to_cm(1, dpi) + 1e-9);
    });
}

// ============================================================================
// Classification and Pricing Properties
// ============================================================================

/// Property: orientation does not change the sheet category
#[test]
fn proptest_classification_is_symmetric() {
    let engine = QuoteEngine::new(EngineConfig::default()).unwrap();
    proptest!(|(width in 0.1f64..400.0, height in 0.1f64..400.0)| {
        let category = engine.classify_sheet(width, height).unwrap();
        prop_assert_eq!(category, engine.classify_sheet(height, width).unwrap());
    });
}

/// Property: more coverage never costs less
#[test]
fn proptest_cost_monotonic_in_coverage() {
    let engine = QuoteEngine::new(EngineConfig::default()).unwrap();
    proptest!(|(
        category in prop::sample::select(SheetCategory::ALL.to_vec()),
        low in 0.0f64..100.0,
        delta in 0.0f64..100.0,
        long_side in 1.0f64..500.0
    )| {
        let cheap = engine.calculate_cost(category, low, long_side).unwrap();
        let dear = engine.calculate_cost(category, low + delta, long_side).unwrap();
        prop_assert!(cheap >= 0.0);
        prop_assert!(cheap <= dear);
    });
}

// ============================================================================
// Imposition and Material Properties
// ============================================================================

/// Property: imposed pieces never exceed the sheet area
#[test]
fn proptest_imposition_bounds() {
    proptest!(|(
        piece_w in 1.0f64..200.0,
        piece_h in 1.0f64..200.0,
        sheet_w in 1.0f64..200.0,
        sheet_h in 1.0f64..200.0
    )| {
        let plan = impose(piece_w, piece_h, sheet_w, sheet_h).unwrap();
        let used = plan.pieces_per_sheet as f64 * piece_w * piece_h;

        prop_assert!(used <= sheet_w * sheet_h + 1e-6);
        prop_assert!(plan.waste_percentage >= -1e-9);
        prop_assert!(plan.waste_percentage <= 100.0);
        prop_assert_eq!(plan.positions().count() as u64, plan.pieces_per_sheet);
    });
}

/// Property: every price component is a multiple of 1000 or its minimum
#[test]
fn proptest_material_quote_steps() {
    let config = MaterialPricingConfig::default();
    let pricer = MaterialPricer::new(config.clone());
    proptest!(|(
        material in prop::sample::select(Material::ALL.to_vec()),
        width in 20.0f64..300.0,
        height in 20.0f64..300.0
    )| {
        if let Ok(quote) = pricer.quote(material, width, height) {
            let (plotting_min, material_min) = if material == Material::Canvas {
                (config.canvas_plotting_min, config.canvas_material_min)
            } else {
                (config.general_plotting_min, 0.0)
            };

            prop_assert!(quote.plotting_cost >= plotting_min);
            prop_assert!(quote.plotting_cost % 1000.0 == 0.0 || quote.plotting_cost == plotting_min);
            prop_assert!(quote.material_cost >= material_min);
            prop_assert!(quote.material_cost % 1000.0 == 0.0 || quote.material_cost == material_min);
            prop_assert!(quote.tube_cost % 1000.0 == 0.0);
            prop_assert_eq!(quote.total, quote.plotting_cost + quote.material_cost + quote.tube_cost);
        }
    });
}
