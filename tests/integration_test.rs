//! Integration tests for the complete quotation workflow
//!
//! These tests exercise the public API end to end:
//! - Loading artwork from disk
//! - Coverage measurement and line art detection
//! - Sheet classification and pricing, single and batched
//! - Price configuration files
//! - Canvas placement, material quotes and imposition

use image::{DynamicImage, Rgb, RgbImage};
use print_quote::{
    calculate_cost, classify_sheet, compute_pixel_stats, detect_line_type, impose,
    is_color_image, load_image, Canvas, EngineConfig, LineType, Material, PageRequest,
    PlacementMode, PrintSize, QuoteEngine, QuoteError, Rotation, SheetCategory, SheetSelection,
    ThresholdOverrides,
};
use std::path::Path;

/// White page with the first `inked_rows` of 100 rows filled with `color`
fn page(inked_rows: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(40, 100, |_, y| {
        if y < inked_rows {
            Rgb(color)
        } else {
            Rgb([255, 255, 255])
        }
    })
}

fn save_png(dir: &Path, name: &str, image: &RgbImage) -> std::path::PathBuf {
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

// ============================================================================
// Artwork Files
// ============================================================================

#[test]
fn test_quote_from_png_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_png(dir.path(), "poster.png", &page(50, [0, 0, 0]));

    let image = load_image(&path).unwrap();
    let engine = QuoteEngine::new(EngineConfig::default()).unwrap();
    let quote = engine
        .quote(
            &image,
            PrintSize::new(70.0, 120.0),
            SheetSelection::Auto,
            &ThresholdOverrides::default(),
        )
        .unwrap();

    assert_eq!(quote.category, SheetCategory::Full);
    assert_eq!(quote.display_name, "Pliego (70cm Ancho x Alto Flexible)");
    assert!((quote.coverage_percentage - 50.0).abs() < 1e-9);
    assert_eq!(quote.cost, 14000.0);
    assert_eq!(quote.stats.total_pixels, 4000);
}

#[test]
fn test_free_functions_on_loaded_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_png(dir.path(), "logo.png", &page(4, [10, 10, 10]));
    let image = load_image(&path).unwrap();

    let stats = compute_pixel_stats(Some(&image), None, None);
    assert_eq!(stats.non_white_count, 160);
    assert_eq!(stats.black_count, 160);
    assert!((stats.non_white_percentage - 4.0).abs() < 1e-9);

    let line_type = detect_line_type(Some(&image), &ThresholdOverrides::default()).unwrap();
    assert_eq!(line_type, LineType::Black);

    let category = classify_sheet(50.0, 35.0).unwrap();
    assert_eq!(category, SheetCategory::Quarter);
    assert_eq!(calculate_cost(category.key(), stats.non_white_percentage, 35.0).unwrap(), 3000.0);
}

#[test]
fn test_load_missing_file() {
    let result = load_image(Path::new("nonexistent_file.png"));
    match result {
        Err(QuoteError::ImageLoadError { .. }) => {}
        other => panic!("Expected ImageLoadError, got: {:?}", other),
    }
}

#[test]
fn test_tone_check_on_loaded_images() {
    let dir = tempfile::tempdir().unwrap();
    let gray = save_png(dir.path(), "gray.png", &page(30, [90, 90, 90]));
    let red = save_png(dir.path(), "red.png", &page(30, [200, 20, 20]));

    assert!(!is_color_image(&load_image(&gray).unwrap().to_rgb8(), 10));
    assert!(is_color_image(&load_image(&red).unwrap().to_rgb8(), 10));
}

// ============================================================================
// Line Art Pricing
// ============================================================================

#[test]
fn test_line_art_prices_by_sheet() {
    let engine = QuoteEngine::new(EngineConfig::default()).unwrap();
    let black = DynamicImage::ImageRgb8(page(5, [0, 0, 0]));
    let color = DynamicImage::ImageRgb8(page(5, [30, 30, 200]));

    let cases = [
        (&black, PrintSize::new(50.0, 35.0), LineType::Black, 2500.0),
        (&color, PrintSize::new(50.0, 35.0), LineType::Color, 3000.0),
        (&black, PrintSize::new(70.0, 50.0), LineType::Black, 3500.0),
        (&color, PrintSize::new(70.0, 100.0), LineType::Color, 7000.0),
    ];

    for (image, size, expected_type, expected_cost) in cases {
        let quote = engine
            .quote(image, size, SheetSelection::Auto, &ThresholdOverrides::default())
            .unwrap();
        assert_eq!(quote.line_type, Some(expected_type), "{:?}", size);
        assert_eq!(quote.cost, expected_cost, "{:?}", size);
    }
}

#[test]
fn test_threshold_overrides_change_classification() {
    let engine = QuoteEngine::new(EngineConfig::default()).unwrap();
    // Dark gray strokes: black with the default cutoff, not with a strict one
    let image = DynamicImage::ImageRgb8(page(5, [120, 120, 120]));
    let size = PrintSize::new(50.0, 35.0);

    let quote = engine
        .quote(&image, size, SheetSelection::Auto, &ThresholdOverrides::default())
        .unwrap();
    assert_eq!(quote.line_type, Some(LineType::Black));

    let strict = ThresholdOverrides::thresholds(100, 253);
    let quote = engine
        .quote(&image, size, SheetSelection::Auto, &strict)
        .unwrap();
    assert_eq!(quote.line_type, Some(LineType::Color));
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_batch_with_fixed_sheet() {
    let engine = QuoteEngine::new(EngineConfig::default()).unwrap();
    let pages: Vec<_> = [0, 20, 60, 100]
        .into_iter()
        .map(|rows| {
            PageRequest::new(format!("page-{}", rows), DynamicImage::ImageRgb8(page(rows, [0, 0, 0])))
                .with_selection(SheetSelection::Fixed(SheetCategory::Extra90))
        })
        .collect();

    let report = engine.quote_batch(&pages);
    assert!(!report.has_failures());

    let costs: Vec<f64> = report.quotes().map(|(_, quote)| quote.cost).collect();
    assert_eq!(costs, [10000.0, 14000.0, 22000.0, 30000.0]);
    assert_eq!(report.total_cost, 76000.0);
}

#[test]
fn test_batch_derives_size_from_pixels() {
    let mut config = EngineConfig::default();
    config.dpi = 2;
    let engine = QuoteEngine::new(config).unwrap();

    // 40 x 100 px at 2 dpi is 50.8 x 127 cm
    let pages = [PageRequest::new("scan", DynamicImage::ImageRgb8(page(50, [0, 0, 0])))];
    let report = engine.quote_batch(&pages);

    let (_, quote) = report.quotes().next().unwrap();
    assert_eq!(quote.category, SheetCategory::Full);
    assert!((quote.long_side_cm - 127.0).abs() < 1e-9);
}

#[test]
fn test_batch_reports_missing_category() {
    let mut config = EngineConfig::default();
    config.sheets.remove(&SheetCategory::Extra100);
    let engine = QuoteEngine::new(config).unwrap();

    let pages = [
        PageRequest::new("ok", DynamicImage::ImageRgb8(page(50, [0, 0, 0])))
            .with_size(PrintSize::new(70.0, 100.0)),
        PageRequest::new("missing", DynamicImage::ImageRgb8(page(50, [0, 0, 0])))
            .with_selection(SheetSelection::Fixed(SheetCategory::Extra100)),
    ];
    let report = engine.quote_batch(&pages);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0.label, "missing");
    assert!(matches!(failures[0].1, QuoteError::UnknownCategory { .. }));
    assert_eq!(report.quotes().count(), 1);
}

// ============================================================================
// Configuration Files
// ============================================================================

#[test]
fn test_edited_config_file_changes_prices() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.json");
    EngineConfig::default().to_json_file(&path).unwrap();

    let mut json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    json["sheets"]["cuarto_pliego"]["base_cost"] = serde_json::json!(3500.0);
    std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

    let engine = QuoteEngine::new(EngineConfig::from_json_file(&path).unwrap()).unwrap();
    assert_eq!(
        engine.calculate_cost(SheetCategory::Quarter, 0.0, 36.0).unwrap(),
        3500.0
    );
}

#[test]
fn test_config_file_with_unknown_sheet_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.json");
    EngineConfig::default().to_json_file(&path).unwrap();

    let mut json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    json["sheets"]
        .as_object_mut()
        .unwrap()
        .remove("medio_pliego");
    std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

    assert!(matches!(
        EngineConfig::from_json_file(&path),
        Err(QuoteError::UnknownCategory { .. })
    ));
}

// ============================================================================
// Canvas, Materials and Imposition
// ============================================================================

#[test]
fn test_canvas_workflow() {
    let engine = QuoteEngine::new(EngineConfig::default()).unwrap();
    let canvas = Canvas::from_pixels(400, 400, 300).unwrap();
    let artwork = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 100, Rgb([0, 0, 0])));

    let placement = print_quote::layout::place_artwork(
        &canvas,
        &artwork,
        Rotation::Deg90,
        PlacementMode::RealSize,
    )
    .unwrap();
    assert_eq!((placement.width(), placement.height()), (100, 200));
    assert_eq!((placement.x, placement.y), (150, 100));

    let quote = engine
        .quote_canvas(&canvas, &placement, &ThresholdOverrides::default())
        .unwrap();
    // 20000 / 160000 px
    assert!((quote.coverage_percentage - 12.5).abs() < 1e-9);
    assert_eq!(quote.category, SheetCategory::Quarter);
    assert_eq!(quote.line_type, None);
}

#[test]
fn test_material_quote_through_engine() {
    let engine = QuoteEngine::new(EngineConfig::default()).unwrap();
    let quote = engine.quote_material(Material::Vinyl, 100.0, 50.0).unwrap();
    assert_eq!(quote.total, 20000.0);

    let rejected = engine.quote_material(Material::Photographic, 80.0, 90.0);
    match rejected {
        Err(error @ QuoteError::UnsupportedMeasure { .. }) => assert!(error.is_recoverable()),
        other => panic!("Expected UnsupportedMeasure, got: {:?}", other),
    }
}

#[test]
fn test_imposition_on_half_sheet() {
    let plan = impose(9.0, 5.0, 70.0, 50.0).unwrap();
    // Upright 7 x 10 = 70, turned 14 x 5 = 70
    assert!(!plan.rotated);
    assert_eq!(plan.pieces_per_sheet, 70);
    assert!(plan.waste_percentage >= 0.0 && plan.waste_percentage < 100.0);
}

// ============================================================================
// Serialization Tests
// ============================================================================

#[test]
fn test_cost_quote_json_shape() {
    let engine = QuoteEngine::new(EngineConfig::default()).unwrap();
    let quote = engine
        .quote(
            &DynamicImage::ImageRgb8(page(5, [0, 0, 0])),
            PrintSize::new(50.0, 35.0),
            SheetSelection::Auto,
            &ThresholdOverrides::default(),
        )
        .unwrap();

    let json = serde_json::to_value(&quote).unwrap();
    assert_eq!(json["category"], "cuarto_pliego");
    assert_eq!(json["line_type"], "black");
    assert_eq!(json["cost"], 2500.0);
    assert_eq!(json["stats"]["total_pixels"], 4000);
}
