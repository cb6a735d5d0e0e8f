//! Command-line interface for print_quote
//!
//! Quotes one or more artwork files and prints a table or JSON

use print_quote::{
    load_image, EngineConfig, PageRequest, PrintSize, QuoteEngine, SheetCategory, SheetSelection,
};
use serde_json::json;
use std::{env, path::Path, process};
use tracing_subscriber::EnvFilter;

/// Directives from `RUST_LOG` when set, warnings only otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

struct Options {
    config_path: Option<String>,
    selection: SheetSelection,
    width_cm: Option<f64>,
    height_cm: Option<f64>,
    json: bool,
    images: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Use --help for usage information");
            process::exit(1);
        }
    };

    let config = match &options.config_path {
        Some(path) => match EngineConfig::from_json_file(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config file: {}", e);
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let engine = match QuoteEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let size = match (options.width_cm, options.height_cm) {
        (Some(width), Some(height)) => Some(PrintSize::new(width, height)),
        (None, None) => None,
        _ => {
            eprintln!("Error: --width-cm and --height-cm must be given together");
            process::exit(1);
        }
    };

    // Unreadable files are reported but do not stop the batch
    let mut load_failures = Vec::new();
    let mut pages = Vec::new();
    for path in &options.images {
        match load_image(Path::new(path)) {
            Ok(image) => {
                let mut page = PageRequest::new(path.as_str(), image).with_selection(options.selection);
                if let Some(size) = size {
                    page = page.with_size(size);
                }
                pages.push(page);
            }
            Err(e) => {
                eprintln!("✗ {}: {}", path, e);
                load_failures.push((path.clone(), e.to_string()));
            }
        }
    }

    let report = engine.quote_batch(&pages);

    if options.json {
        let quotes: Vec<_> = report
            .quotes()
            .map(|(page, quote)| json!({ "file": page.label, "quote": quote }))
            .collect();
        let failures: Vec<_> = load_failures
            .iter()
            .map(|(file, error)| json!({ "file": file, "error": error }))
            .chain(
                report
                    .failures()
                    .map(|(page, error)| json!({ "file": page.label, "error": error.to_string() })),
            )
            .collect();
        let output = json!({
            "quotes": quotes,
            "failures": failures,
            "total_cost": report.total_cost,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing result: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("| File | Sheet | Coverage | Line | Cost |");
        println!("|------|-------|----------|------|------|");
        for (page, quote) in report.quotes() {
            let line = quote
                .line_type
                .map(|line_type| line_type.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "| {} | {} | {:.2}% | {} | ${:.0} |",
                page.label, quote.display_name, quote.coverage_percentage, line, quote.cost
            );
        }
        for (page, error) in report.failures() {
            eprintln!("✗ {}: {}", page.label, error);
            if error.is_recoverable() {
                eprintln!("  Suggestion: {}", error.user_message());
            }
        }
        println!();
        println!("Total: ${:.0}", report.total_cost);
    }

    if report.has_failures() || !load_failures.is_empty() {
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config_path: None,
        selection: SheetSelection::Auto,
        width_cm: None,
        height_cm: None,
        json: false,
        images: Vec::new(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => options.config_path = Some(value_after(args, &mut i)?.to_string()),
            "--sheet" => {
                let key = value_after(args, &mut i)?;
                let category: SheetCategory = key.parse().map_err(|e| format!("{}", e))?;
                options.selection = SheetSelection::Fixed(category);
            }
            "--width-cm" => options.width_cm = Some(number_after(args, &mut i)?),
            "--height-cm" => options.height_cm = Some(number_after(args, &mut i)?),
            "--json" => options.json = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => options.images.push(arg.to_string()),
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    if options.images.is_empty() {
        print_help(&args[0]);
        process::exit(1);
    }
    Ok(options)
}

fn value_after<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} expects a value", flag))
}

fn number_after(args: &[String], i: &mut usize) -> Result<f64, String> {
    let flag = args[*i].clone();
    let value = value_after(args, i)?;
    value
        .parse::<f64>()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, value))
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image>...", program_name);
    eprintln!();
    eprintln!("Quote print jobs from their artwork.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE      Price configuration (default: built-in prices)");
    eprintln!("  --sheet KEY        Print every file on this sheet (e.g. pliego)");
    eprintln!("  --width-cm W       Print width; requires --height-cm");
    eprintln!("  --height-cm H      Print height; requires --width-cm");
    eprintln!("                     Without a size, it is derived from pixels at the configured DPI");
    eprintln!("  --json             Print results as JSON");
    eprintln!("  --help, -h         Show this help message");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG=debug     Log classification and pricing decisions");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} poster.png", program_name);
    eprintln!("  {} --width-cm 70 --height-cm 120 poster.png", program_name);
    eprintln!("  {} --sheet medio_pliego --json page1.png page2.png", program_name);
}
