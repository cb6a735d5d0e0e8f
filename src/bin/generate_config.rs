//! Generate the default price configuration file
//!
//! Creates a JSON config with every built-in price and threshold

use print_quote::EngineConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} prices/default.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = EngineConfig::default();

    match config.to_json_file(output_path) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!("  DPI: {}", config.dpi);
            eprintln!(
                "  Line detection: black <= {}, white >= {}, ratio >= {:.2}",
                config.line_detection.black_threshold,
                config.line_detection.white_threshold,
                config.line_detection.min_black_ratio
            );
            eprintln!(
                "  Line pricing up to {:.0}% coverage on {} sheets",
                config.line_pricing_max_coverage,
                config.line_costs.len()
            );
            for (category, spec) in &config.sheets {
                eprintln!(
                    "  {:<14} {:>5.0} x {:<5.0} cm  {:>6.0} - {:<6.0}",
                    category.key(),
                    spec.width_cm,
                    spec.height_cm,
                    spec.base_cost,
                    spec.full_cost
                );
            }
            eprintln!("  Materials: {}", config.materials.materials.len());
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
